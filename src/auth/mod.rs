//! Authentication module: credential validation, password hashing, and
//! session-token issuance/rotation.
//!
//! The entry point is [`AccountAuthenticator`], which is injected with a
//! [`UserStore`](crate::store::UserStore) and a [`PasswordHasher`]:
//!
//! - registration data is validated with every violation collected, not
//!   just the first
//! - passwords are hashed with Argon2id by default
//! - session tokens are 24 random bytes, base64-encoded, unique across all
//!   accounts, and rotated on demand
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use account_auth::auth::{AccountAuthenticator, Argon2Hasher, UserAccount};
//! use account_auth::store::MemoryUserStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryUserStore::new());
//!     let auth = AccountAuthenticator::new(store, Arc::new(Argon2Hasher))?;
//!
//!     let account = auth
//!         .register(UserAccount::new("alice", "alice@example.com"), "hunter22")
//!         .await?;
//!     assert!(account.session_token.is_some());
//!
//!     let logged_in = auth.find_by_credentials("alice@example.com", "hunter22").await?;
//!     assert!(logged_in.is_some());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod password;
pub mod validate;

pub use errors::{AuthError, AuthResult, HashError, ValidationError};
pub use manager::AccountAuthenticator;
pub use models::{AccountChanges, AccountId, UserAccount};
pub use password::{Argon2Hasher, PasswordHasher};
pub use validate::is_email_shaped;
