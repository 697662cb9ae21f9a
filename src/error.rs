//! Error types for the slip desk

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the slip desk
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No master slip ID provided")]
    MissingSlipId,

    // Fetch errors
    #[error("Failed to fetch slips: {0}")]
    Fetch(String),

    #[error("Slip fetch timed out after {0}ms")]
    FetchTimeout(u64),

    #[error("Invalid payload structure: {0}")]
    InvalidPayload(String),

    // Session errors
    #[error("Slip not found: {0}")]
    SlipNotFound(String),

    #[error("Slip {0} is already being removed")]
    SlipInFlight(String),

    #[error("Invalid bankroll amount: {0:?}")]
    InvalidBankroll(String),

    #[error("Invalid stake: {0}")]
    InvalidStake(f64),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    // Serialization errors
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Check if this error belongs to the fetch/config family.
    ///
    /// These are surfaced to the operator as a single message and leave the
    /// session with an empty slip collection. None of them are retried.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::MissingSlipId
                | Error::Fetch(_)
                | Error::FetchTimeout(_)
                | Error::InvalidPayload(_)
                | Error::Deserialization(_)
                | Error::Io(_)
        )
    }

    /// Check if this error was caused by an action on a slip that cannot take it
    pub fn is_slip_action_rejected(&self) -> bool {
        matches!(self, Error::SlipNotFound(_) | Error::SlipInFlight(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Deserialization(e.to_string())
        } else {
            Error::Fetch(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Deserialization(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_grouping() {
        assert!(Error::MissingSlipId.is_fetch_error());
        assert!(Error::InvalidPayload("slips".into()).is_fetch_error());
        assert!(!Error::SlipInFlight("s1".into()).is_fetch_error());
        assert!(Error::SlipInFlight("s1".into()).is_slip_action_rejected());
    }

    #[test]
    fn test_missing_slip_id_message() {
        assert_eq!(Error::MissingSlipId.to_string(), "No master slip ID provided");
    }
}
