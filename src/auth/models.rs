//! Account data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account ID type, assigned by the store on creation
pub type AccountId = i64;

/// User account record
///
/// `id`, `created_at`, and `updated_at` are `None` until the store has
/// persisted the record. `session_token` is `None` until the account has
/// gone through [`validate_and_prepare`](crate::auth::AccountAuthenticator::validate_and_prepare).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Option<AccountId>,
    pub email: String,
    pub username: String,
    pub password_digest: String,
    pub session_token: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserAccount {
    /// Create an unsaved account candidate with the given username and email
    ///
    /// # Returns
    ///
    /// * `UserAccount` - Candidate with no id, digest, token, or timestamps
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            username: username.into(),
            password_digest: String::new(),
            session_token: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the account still needs a session token issued
    ///
    /// `None` and an empty string both count as unset, so a rehydrated
    /// record with a blank column cannot bypass token issuance.
    pub fn session_token_unset(&self) -> bool {
        matches!(self.session_token.as_deref(), None | Some(""))
    }
}

/// Partial update applied through [`UserStore::update`](crate::store::UserStore::update)
///
/// `None` fields are left untouched by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub password_digest: Option<String>,
    pub session_token: Option<String>,
}
