//! In-memory repository

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::domain::AccountMap;
use crate::ports::AccountRepository;

/// Repository that keeps the mapping in memory
///
/// Counts saves and can be told to fail them, which lets tests check that
/// every mutation persists exactly once and that failed saves roll back.
#[derive(Default)]
pub struct InMemoryRepository {
    accounts: Mutex<AccountMap>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing mapping
    pub fn with_accounts(accounts: AccountMap) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            ..Self::default()
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail with an IO error
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Copy of the last saved mapping
    pub fn snapshot(&self) -> Result<AccountMap> {
        self.load()
    }
}

impl AccountRepository for InMemoryRepository {
    fn load(&self) -> Result<AccountMap> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|e| Error::Other(format!("Lock poisoned: {}", e)))?;
        Ok(accounts.clone())
    }

    fn save(&self, accounts: &AccountMap) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated write failure",
            )));
        }
        let mut stored = self
            .accounts
            .lock()
            .map_err(|e| Error::Other(format!("Lock poisoned: {}", e)))?;
        *stored = accounts.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
