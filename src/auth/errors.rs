//! Authentication error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Single field-level validation violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Column the violation is about
    pub field: &'static str,
    /// Human-readable message, e.g. "can't be blank"
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Authentication errors
///
/// A failed login is NOT an error: `find_by_credentials` returns `Ok(None)`
/// for an unknown credential or a wrong password. Errors here are either
/// validation results (returned as data, all violations collected) or
/// infrastructure failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Validation rejected the candidate; carries every violation found
    #[error("Validation failed: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<ValidationError>),

    /// Password hashing failed
    #[error("Password hashing failed")]
    Hashing(#[from] HashError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Store and hashing failures are sanitized so callers can't learn
    /// anything about the backing infrastructure.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Invalid(_) => self.to_string(),
            AuthError::Hashing(_) | AuthError::Store(_) => "Internal server error".to_string(),
        }
    }
}

/// Password hashing failure
#[derive(Debug, Error)]
#[error("Password hashing failed")]
pub struct HashError;

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
