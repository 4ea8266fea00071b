//! Account persistence layer.
//!
//! Defines the [`UserStore`] trait that the authenticator is injected with,
//! plus the two bundled implementations:
//!
//! - [`PgUserStore`]: PostgreSQL-backed store using sqlx
//! - [`MemoryUserStore`]: in-memory store for tests and embedding
//!
//! The store is the authoritative guard for uniqueness: `create` and
//! `update` must reject a duplicate `username`, `email`, `session_token`,
//! or `password_digest` with [`StoreError::UniqueViolation`] even when an
//! earlier existence check passed (see the race note on
//! [`AccountAuthenticator::reset_session_token`](crate::auth::AccountAuthenticator::reset_session_token)).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::models::{AccountChanges, UserAccount};

pub mod config;
pub mod errors;
pub mod memory;
pub mod postgres;

pub use config::DatabaseConfig;
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Account columns a store can be queried by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountField {
    Email,
    Username,
    SessionToken,
    PasswordDigest,
}

impl AccountField {
    /// Column name for this field
    pub fn column(&self) -> &'static str {
        match self {
            AccountField::Email => "email",
            AccountField::Username => "username",
            AccountField::SessionToken => "session_token",
            AccountField::PasswordDigest => "password_digest",
        }
    }
}

impl fmt::Display for AccountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Trait for account store operations
///
/// Injected into [`AccountAuthenticator`](crate::auth::AccountAuthenticator);
/// implement it to back the authenticator with any persistence mechanism.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the account whose `field` column equals `value`
    async fn find_one(&self, field: AccountField, value: &str) -> StoreResult<Option<UserAccount>>;

    /// Whether any account has `value` in its `field` column
    async fn exists_with(&self, field: AccountField, value: &str) -> StoreResult<bool>;

    /// Persist a new account, assigning its id and timestamps
    ///
    /// # Errors
    ///
    /// * `StoreError::UniqueViolation` - A unique column already holds `value`
    /// * `StoreError::NullViolation` - A required column is empty
    async fn create(&self, account: UserAccount) -> StoreResult<UserAccount>;

    /// Apply `changes` to a persisted account and return the updated record
    ///
    /// # Errors
    ///
    /// * `StoreError::NotFound` - The account has no id or no longer exists
    /// * `StoreError::UniqueViolation` - A change collides with another row
    async fn update(&self, account: &UserAccount, changes: AccountChanges)
    -> StoreResult<UserAccount>;
}
