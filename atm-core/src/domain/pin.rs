//! PIN domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::Error;

/// Number of digits in a PIN
pub const PIN_LENGTH: usize = 4;

/// A 4-digit PIN
///
/// The PIN is both the account identifier and its only credential. Anyone
/// who knows a PIN can operate the account it names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pin(String);

impl Pin {
    /// Parse user input into a PIN. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let input = input.trim();
        if Self::is_valid(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(Error::InvalidPin)
        }
    }

    /// Check that a string is exactly four ASCII digits
    pub fn is_valid(s: &str) -> bool {
        s.len() == PIN_LENGTH && s.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Persisted keys must already be in canonical form, so no trimming here.
impl TryFrom<String> for Pin {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(format!("invalid PIN key {:?}: expected 4 digits", value))
        }
    }
}

impl From<Pin> for String {
    fn from(pin: Pin) -> Self {
        pin.0
    }
}
