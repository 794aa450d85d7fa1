//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O.

mod account;
mod backup;
mod pin;
pub mod result;

pub use account::{parse_amount, Account, DEPOSIT_PREFIX, WITHDRAW_PREFIX};
pub use backup::{format_size, BackupMetadata};
pub use pin::{Pin, PIN_LENGTH};

/// The full PIN -> account mapping, ordered by PIN
pub type AccountMap = std::collections::BTreeMap<Pin, Account>;
