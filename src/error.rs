//! Error types for the annotation client

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, EntityError>;

/// Errors reported by entity operations
#[derive(Error, Debug)]
pub enum EntityError {
    /// Required configuration (base endpoint) was never supplied.
    /// Always a caller setup bug, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A transport-level failure during fetch/save/destroy.
    /// Local attribute state is preserved; retry policy is up to the caller.
    #[error("Sync failed: {0}")]
    Sync(#[from] TransportError),

    /// An operation reached a destroyed entity, either called directly on it
    /// or as a completion that arrived after destruction.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Transport-specific errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Server returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            TransportError::Status {
                code: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::InvalidBody(err.to_string())
        } else {
            TransportError::Connection(err.to_string())
        }
    }
}
