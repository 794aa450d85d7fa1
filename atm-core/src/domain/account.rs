//! Account domain model

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// History entry prefix for deposits
pub const DEPOSIT_PREFIX: &str = "Deposited ";
/// History entry prefix for withdrawals
pub const WITHDRAW_PREFIX: &str = "Withdrew ";

/// A single account record, keyed by its PIN in the store
///
/// Stored as `{ "balance": number, "history": [string, ...] }`. The balance is
/// written as a plain JSON number carrying every digit, so it reads back
/// exactly and older integer or float balances still load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
    /// Human-readable transaction descriptions, oldest first
    #[serde(default)]
    pub history: Vec<String>,
}

impl Account {
    /// Create an empty account with zero balance
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a strictly positive amount and record it. A sum too large to
    /// represent is rejected like any other invalid amount.
    pub fn deposit(&mut self, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        self.history.push(format!("{}{}", DEPOSIT_PREFIX, amount));
        Ok(())
    }

    /// Remove an amount in `(0, balance]` and record it
    pub fn withdraw(&mut self, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }
        if amount > self.balance {
            return Err(Error::InsufficientFunds);
        }
        self.balance -= amount;
        self.history.push(format!("{}{}", WITHDRAW_PREFIX, amount));
        Ok(())
    }

    /// Validate account data loaded from storage
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.balance < Decimal::ZERO {
            return Err("balance cannot be negative");
        }
        Ok(())
    }
}

/// Parse a monetary amount typed by the user
///
/// Empty input (a cancelled prompt), unparsable text, zero and negative values
/// all collapse into the same `InvalidAmount` outcome.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::InvalidAmount);
    }
    let amount = Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| Error::InvalidAmount)?;
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount);
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_empty() {
        let account = Account::new();
        assert_eq!(account.balance, Decimal::ZERO);
        assert!(account.history.is_empty());
    }

    #[test]
    fn test_deposit_and_withdraw() {
        let mut account = Account::new();
        account.deposit(Decimal::new(500, 0)).unwrap();
        account.withdraw(Decimal::new(200, 0)).unwrap();

        assert_eq!(account.balance, Decimal::new(300, 0));
        assert_eq!(account.history, vec!["Deposited 500", "Withdrew 200"]);
    }

    #[test]
    fn test_rejected_operations_leave_account_unchanged() {
        let mut account = Account::new();
        account.deposit(Decimal::new(100, 0)).unwrap();
        let before = account.clone();

        assert!(matches!(account.deposit(Decimal::ZERO), Err(Error::InvalidAmount)));
        assert!(matches!(account.deposit(Decimal::new(-5, 0)), Err(Error::InvalidAmount)));
        assert!(matches!(account.withdraw(Decimal::ZERO), Err(Error::InvalidAmount)));
        assert!(matches!(
            account.withdraw(Decimal::new(10001, 2)),
            Err(Error::InsufficientFunds)
        ));
        assert_eq!(account, before);
    }

    #[test]
    fn test_overflowing_deposit_is_rejected() {
        let mut account = Account::new();
        account.deposit(Decimal::MAX).unwrap();
        let before = account.clone();

        assert!(matches!(account.deposit(Decimal::ONE), Err(Error::InvalidAmount)));
        assert_eq!(account, before);
        assert_eq!(account.history.len(), 1);
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut account = Account::new();
        account.deposit(Decimal::new(1250, 2)).unwrap();
        account.withdraw(Decimal::new(1250, 2)).unwrap();
        assert!(account.balance.is_zero());
        assert_eq!(account.history[1], "Withdrew 12.50");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("500").unwrap(), Decimal::new(500, 0));
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_amount("1e3").unwrap(), Decimal::new(1000, 0));

        for input in ["", "   ", "0", "0.00", "-10", "ten", "1,000"] {
            assert!(
                matches!(parse_amount(input), Err(Error::InvalidAmount)),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_serialized_shape() {
        let json = r#"{"balance": 150.5, "history": ["Deposited 150.5"]}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.balance, Decimal::new(1505, 1));

        let value = serde_json::to_value(&account).unwrap();
        assert!(value["balance"].is_number());
        assert_eq!(value["history"][0], "Deposited 150.5");
    }

    #[test]
    fn test_balance_is_written_exactly() {
        let mut account = Account::new();
        account.deposit(parse_amount("1234567.123456789012345").unwrap()).unwrap();

        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains("\"balance\":1234567.123456789012345"));
        let reloaded: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, account);

        let mut largest = Account::new();
        largest.deposit(parse_amount("79228162514264337593543950335").unwrap()).unwrap();
        let reloaded: Account =
            serde_json::from_str(&serde_json::to_string(&largest).unwrap()).unwrap();
        assert_eq!(reloaded.balance, Decimal::MAX);
    }

    #[test]
    fn test_integer_balance_loads() {
        let account: Account = serde_json::from_str(r#"{"balance": 0, "history": []}"#).unwrap();
        assert!(account.balance.is_zero());
        assert!(account.validate().is_ok());
    }

    #[test]
    fn test_negative_balance_fails_validation() {
        let account: Account = serde_json::from_str(r#"{"balance": -1, "history": []}"#).unwrap();
        assert!(account.validate().is_err());
    }
}
