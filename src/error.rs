//! Error types for anonboard.

use thiserror::Error;

/// Common error type for anonboard.
///
/// An incorrect deletion password is not an error: it is reported through
/// [`crate::board::DeleteOutcome`] so callers handle it as a normal result.
#[derive(Error, Debug)]
pub enum AnonboardError {
    /// Database error.
    ///
    /// Wraps any failure of the backing store. Errors from sqlx are
    /// converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The secret hashing primitive failed.
    #[error("secret hashing error: {0}")]
    Secret(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AnonboardError {
    /// Not-found error for a thread id that does not resolve.
    pub fn thread_not_found() -> Self {
        AnonboardError::NotFound("Thread".to_string())
    }

    /// Not-found error for a reply id that does not resolve within its thread.
    pub fn reply_not_found() -> Self {
        AnonboardError::NotFound("Reply".to_string())
    }
}

impl From<sqlx::Error> for AnonboardError {
    fn from(e: sqlx::Error) -> Self {
        AnonboardError::Database(e.to_string())
    }
}

/// Result type alias for anonboard operations.
pub type Result<T> = std::result::Result<T, AnonboardError>;
