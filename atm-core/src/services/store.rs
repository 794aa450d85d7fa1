//! Account store - the PIN -> account mapping and its mutations
//!
//! The store is loaded once from its repository and rewritten in full after
//! every change. A mutation is applied to a working copy first and only
//! becomes visible once the save succeeds, so a failed operation never leaves
//! memory and disk out of step.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountMap, Pin};
use crate::ports::AccountRepository;

/// Outcome of looking up a PIN at login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    /// An account exists for this PIN
    Existing(Pin),
    /// Valid PIN with no account; offer to create one
    New(Pin),
}

impl Authentication {
    pub fn pin(&self) -> &Pin {
        match self {
            Authentication::Existing(pin) | Authentication::New(pin) => pin,
        }
    }
}

pub struct AccountStore {
    repository: Arc<dyn AccountRepository>,
    accounts: AccountMap,
}

impl AccountStore {
    /// Load the full mapping from the repository
    pub fn load(repository: Arc<dyn AccountRepository>) -> Result<Self> {
        let accounts = repository.load()?;
        Ok(Self {
            repository,
            accounts,
        })
    }

    /// Write the full mapping back to the repository
    pub fn save(&self) -> Result<()> {
        self.repository.save(&self.accounts)
    }

    /// Look up a PIN typed at the login screen
    pub fn authenticate(&self, input: &str) -> Result<Authentication> {
        let pin = Pin::parse(input)?;
        if self.accounts.contains_key(&pin) {
            Ok(Authentication::Existing(pin))
        } else {
            Ok(Authentication::New(pin))
        }
    }

    /// Insert a new account with zero balance and empty history
    pub fn create(&mut self, pin: &Pin) -> Result<()> {
        self.commit(|accounts| {
            if accounts.contains_key(pin) {
                return Err(Error::PinInUse);
            }
            accounts.insert(pin.clone(), Account::new());
            Ok(())
        })
    }

    /// Move the account under `old` to the PIN typed as `new_input`
    pub fn rename(&mut self, old: &Pin, new_input: &str) -> Result<Pin> {
        let new = Pin::parse(new_input)?;
        self.commit(|accounts| {
            if accounts.contains_key(&new) {
                return Err(Error::PinInUse);
            }
            let account = accounts.remove(old).ok_or(Error::NotFound)?;
            accounts.insert(new.clone(), account);
            Ok(new)
        })
    }

    /// Remove the account entirely. There is no undo.
    pub fn delete(&mut self, pin: &Pin) -> Result<Account> {
        self.commit(|accounts| accounts.remove(pin).ok_or(Error::NotFound))
    }

    /// Deposit into an account, returning the new balance
    pub fn deposit(&mut self, pin: &Pin, amount: Decimal) -> Result<Decimal> {
        self.commit(|accounts| {
            let account = accounts.get_mut(pin).ok_or(Error::NotFound)?;
            account.deposit(amount)?;
            Ok(account.balance)
        })
    }

    /// Withdraw from an account, returning the new balance
    pub fn withdraw(&mut self, pin: &Pin, amount: Decimal) -> Result<Decimal> {
        self.commit(|accounts| {
            let account = accounts.get_mut(pin).ok_or(Error::NotFound)?;
            account.withdraw(amount)?;
            Ok(account.balance)
        })
    }

    pub fn balance(&self, pin: &Pin) -> Result<Decimal> {
        Ok(self.account(pin)?.balance)
    }

    pub fn history(&self, pin: &Pin) -> Result<&[String]> {
        Ok(&self.account(pin)?.history)
    }

    pub fn get(&self, pin: &Pin) -> Option<&Account> {
        self.accounts.get(pin)
    }

    pub fn contains(&self, pin: &Pin) -> bool {
        self.accounts.contains_key(pin)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Total number of history entries across all accounts
    pub fn transaction_count(&self) -> usize {
        self.accounts.values().map(|a| a.history.len()).sum()
    }

    /// The in-memory mapping
    pub fn accounts(&self) -> &AccountMap {
        &self.accounts
    }

    /// Where the store is persisted
    pub fn location(&self) -> String {
        self.repository.describe()
    }

    fn account(&self, pin: &Pin) -> Result<&Account> {
        self.accounts.get(pin).ok_or(Error::NotFound)
    }

    fn commit<T>(&mut self, change: impl FnOnce(&mut AccountMap) -> Result<T>) -> Result<T> {
        let mut next = self.accounts.clone();
        let out = change(&mut next)?;
        self.repository.save(&next)?;
        self.accounts = next;
        Ok(out)
    }
}
