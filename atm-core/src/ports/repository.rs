//! Repository port - persistence of the account mapping

use crate::domain::result::Result;
use crate::domain::AccountMap;

/// Whole-store persistence
///
/// There is no incremental API: the store is read once and rewritten in full
/// after every change.
pub trait AccountRepository: Send + Sync {
    /// Read the full mapping. A repository that has never been written
    /// returns an empty mapping.
    fn load(&self) -> Result<AccountMap>;

    /// Replace the persisted mapping with `accounts`
    fn save(&self, accounts: &AccountMap) -> Result<()>;

    /// Human-readable location, for status output
    fn describe(&self) -> String;
}
