//! Store error types.

use thiserror::Error;

use super::AccountField;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint rejected a write
    #[error("Unique constraint violated on {0}")]
    UniqueViolation(AccountField),

    /// Not-null constraint rejected a write
    #[error("Not-null constraint violated on {0}")]
    NullViolation(AccountField),

    /// Account does not exist (or was never persisted)
    #[error("Account not found")]
    NotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
