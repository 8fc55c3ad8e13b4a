//! Common error types for evaltrack

use thiserror::Error;

/// Common result type for evaltrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the store, the aggregator and the HTTP layer
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or out-of-range input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown rubric kind
    #[error("Invalid rubric kind: {0}")]
    InvalidKind(String),

    /// Unknown candidate
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage failure (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data that cannot be decoded
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::InvalidKind(_) | Error::NotFound(_)
        )
    }
}
