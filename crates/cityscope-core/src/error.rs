//! Error types for cityscope.

use thiserror::Error;

/// Result type alias using cityscope's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cityscope operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found (unknown location, zero geocoding matches)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Third-party call failed, timed out, or returned unparseable data
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Upstream(format!("request timed out: {}", e))
        } else {
            Error::Upstream(e.to_string())
        }
    }
}
