//! # Account Auth
//!
//! A user-account authentication library: credential storage with hashed
//! passwords, lookup-by-credential authentication, and unique session-token
//! issuance and rotation.
//!
//! The library owns no wire or file format; it is a contract consumed by
//! whatever request-handling layer sits on top. Persistence is delegated to
//! the injected [`UserStore`](store::UserStore) collaborator, and password
//! hashing to the injected [`PasswordHasher`](auth::PasswordHasher).
//!
//! ## Core Modules
//!
//! - [`auth`]: the [`AccountAuthenticator`](auth::AccountAuthenticator) and
//!   its validation, hashing, and token logic
//! - [`store`]: the [`UserStore`](store::UserStore) trait plus the bundled
//!   PostgreSQL and in-memory implementations
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use account_auth::{AccountAuthenticator, Argon2Hasher, MemoryUserStore, UserAccount};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = AccountAuthenticator::new(
//!         Arc::new(MemoryUserStore::new()),
//!         Arc::new(Argon2Hasher),
//!     )?;
//!
//!     let mut account = auth
//!         .register(UserAccount::new("alice", "alice@example.com"), "hunter22")
//!         .await?;
//!
//!     // Rotating the session token always yields a fresh unique value.
//!     let token = auth.reset_session_token(&mut account).await?;
//!     assert_eq!(account.session_token.as_deref(), Some(token.as_str()));
//!     Ok(())
//! }
//! ```

/// Authentication: validation, password hashing, session tokens.
pub mod auth;
pub use auth::{
    AccountAuthenticator, AccountChanges, AccountId, Argon2Hasher, AuthError, AuthResult,
    PasswordHasher, UserAccount, ValidationError,
};

/// Persistence: the store trait and its implementations.
pub mod store;
pub use store::{
    AccountField, DatabaseConfig, MemoryUserStore, PgUserStore, StoreError, StoreResult, UserStore,
};
