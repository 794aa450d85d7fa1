//! Status service - summary of the account store

use std::path::PathBuf;

use serde::Serialize;

use crate::services::store::AccountStore;

pub struct StatusService {
    data_path: PathBuf,
}

impl StatusService {
    pub fn new(data_path: PathBuf) -> Self {
        Self { data_path }
    }

    /// Counts only; no PINs or balances are reported
    pub fn get_status(&self, store: &AccountStore) -> StatusSummary {
        let size_bytes = std::fs::metadata(&self.data_path).map(|m| m.len()).ok();
        let accounts_with_history = store
            .accounts()
            .values()
            .filter(|a| !a.history.is_empty())
            .count();

        StatusSummary {
            total_accounts: store.len(),
            accounts_with_history,
            total_transactions: store.transaction_count(),
            data_file: self.data_path.display().to_string(),
            data_file_exists: size_bytes.is_some(),
            data_file_size_bytes: size_bytes.unwrap_or(0),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_accounts: usize,
    pub accounts_with_history: usize,
    pub total_transactions: usize,
    pub data_file: String,
    pub data_file_exists: bool,
    pub data_file_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use crate::adapters::memory::InMemoryRepository;
    use crate::domain::Pin;

    #[test]
    fn test_status_counts() {
        let mut store = AccountStore::load(Arc::new(InMemoryRepository::new())).unwrap();
        let a = Pin::parse("1111").unwrap();
        store.create(&a).unwrap();
        store.create(&Pin::parse("2222").unwrap()).unwrap();
        store.deposit(&a, Decimal::TEN).unwrap();
        store.withdraw(&a, Decimal::ONE).unwrap();

        let status = StatusService::new(PathBuf::from("/nonexistent/users.json")).get_status(&store);
        assert_eq!(status.total_accounts, 2);
        assert_eq!(status.accounts_with_history, 1);
        assert_eq!(status.total_transactions, 2);
        assert!(!status.data_file_exists);
    }
}
