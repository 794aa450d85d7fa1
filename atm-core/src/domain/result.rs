//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// The first group of variants are recoverable user-input errors: the
/// operation is abandoned and nothing changes. The rest come from storage.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Enter a valid 4-digit PIN")]
    InvalidPin,

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Insufficient balance")]
    InsufficientFunds,

    #[error("PIN already in use")]
    PinInUse,

    #[error("No account found for this PIN")]
    NotFound,

    #[error("Not available here: {0}")]
    InvalidState(String),

    #[error("Data file is in use by another session: {0}")]
    Locked(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// True for errors caused by user input, which leave all state untouched
    /// and are reported as warnings rather than failures.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidPin
                | Error::InvalidAmount
                | Error::InsufficientFunds
                | Error::PinInUse
                | Error::NotFound
                | Error::InvalidState(_)
        )
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::InvalidPin.is_recoverable());
        assert!(Error::InsufficientFunds.is_recoverable());
        assert!(Error::invalid_state("deposit").is_recoverable());
        assert!(!Error::validation("bad file").is_recoverable());
        assert!(!Error::Locked("users.json".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::InvalidPin.to_string(), "Enter a valid 4-digit PIN");
        assert_eq!(Error::PinInUse.to_string(), "PIN already in use");
        assert!(Error::validation("negative balance")
            .to_string()
            .contains("Validation error"));
    }
}
