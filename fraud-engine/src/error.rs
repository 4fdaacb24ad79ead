//! Error types for fraud engine

use thiserror::Error;

/// Fraud engine error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Transaction context rejected by strict evaluation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Rule table is malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Stable error code, as surfaced to API callers
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
