//! Account authenticator implementation.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::RngCore;

use super::{
    errors::{AuthError, AuthResult, ValidationError},
    models::{AccountChanges, UserAccount},
    password::PasswordHasher,
    validate::{check_email, check_raw_password, check_username, is_email_shaped, password_length_ok},
};
use crate::store::{AccountField, StoreError, UserStore};

/// Number of random bytes behind each session token (32 chars once encoded)
const SESSION_TOKEN_BYTES: usize = 24;

/// Account authenticator
///
/// The core component: validates registration data, hashes and verifies
/// passwords through the injected [`PasswordHasher`], and issues/rotates
/// unique session tokens against the injected [`UserStore`].
pub struct AccountAuthenticator<S: UserStore> {
    store: Arc<S>,
    hasher: Arc<dyn PasswordHasher>,
    /// Digest verified against when no account matches a credential, so a
    /// miss costs the same as a wrong password.
    decoy_digest: String,
}

impl<S: UserStore> AccountAuthenticator<S> {
    /// Create a new authenticator
    ///
    /// # Arguments
    ///
    /// * `store` - Account store collaborator
    /// * `hasher` - Password hashing collaborator
    ///
    /// # Errors
    ///
    /// * `AuthError::Hashing` - The hasher could not produce the decoy digest
    pub fn new(store: Arc<S>, hasher: Arc<dyn PasswordHasher>) -> AuthResult<Self> {
        let decoy_digest = hasher.hash("decoy-credential-burn")?;
        Ok(Self {
            store,
            hasher,
            decoy_digest,
        })
    }

    /// Validate an account candidate and prepare it for persistence
    ///
    /// Preparation runs exactly once, before any check: an unset session
    /// token is replaced with a freshly generated unique one (a token the
    /// caller already set is left untouched), and an empty digest is
    /// computed from `raw_password` when one of valid length is supplied.
    ///
    /// Validation then collects every violation instead of stopping at the
    /// first: presence and uniqueness of username/digest/token, username
    /// length and not-email shape, email length and shape, raw password
    /// length. Uniqueness pre-checks here are best-effort fast feedback;
    /// the store's constraints remain the authoritative guard at write time.
    ///
    /// # Errors
    ///
    /// * `AuthError::Invalid` - One or more violations, all collected
    /// * `AuthError::Store` - A uniqueness pre-check could not be run
    pub async fn validate_and_prepare(
        &self,
        mut candidate: UserAccount,
        raw_password: Option<&str>,
    ) -> AuthResult<UserAccount> {
        if candidate.session_token_unset() {
            candidate.session_token = Some(self.generate_unique_session_token().await?);
        }
        if candidate.password_digest.is_empty() {
            if let Some(raw) = raw_password {
                if password_length_ok(raw) {
                    candidate.password_digest = self.hasher.hash(raw)?;
                }
            }
        }

        let mut errors = Vec::new();
        check_username(&candidate.username, &mut errors);
        check_email(&candidate.email, &mut errors);
        if let Some(raw) = raw_password {
            check_raw_password(raw, &mut errors);
        } else if candidate.password_digest.is_empty() {
            errors.push(ValidationError::new("password_digest", "can't be blank"));
        }

        self.check_unique(AccountField::Username, &candidate.username, &candidate, &mut errors)
            .await?;
        self.check_unique(
            AccountField::PasswordDigest,
            &candidate.password_digest,
            &candidate,
            &mut errors,
        )
        .await?;
        if let Some(token) = candidate.session_token.as_deref() {
            self.check_unique(AccountField::SessionToken, token, &candidate, &mut errors)
                .await?;
        }

        if errors.is_empty() {
            Ok(candidate)
        } else {
            Err(AuthError::Invalid(errors))
        }
    }

    /// Look up an account by credential and verify its password
    ///
    /// The credential is classified by the email grammar: email-shaped
    /// values are looked up by email, everything else by username. An
    /// unknown credential and a wrong password both return `Ok(None)` and
    /// are indistinguishable to the caller, including by timing: a miss
    /// still burns one verification against a throwaway digest.
    ///
    /// # Errors
    ///
    /// * `AuthError::Store` - The lookup itself failed
    pub async fn find_by_credentials(
        &self,
        credential: &str,
        raw_password: &str,
    ) -> AuthResult<Option<UserAccount>> {
        let field = if is_email_shaped(credential) {
            AccountField::Email
        } else {
            AccountField::Username
        };

        match self.store.find_one(field, credential).await? {
            Some(account) if self.hasher.verify(raw_password, &account.password_digest) => {
                Ok(Some(account))
            }
            Some(_) => Ok(None),
            None => {
                let _ = self.hasher.verify(raw_password, &self.decoy_digest);
                Ok(None)
            }
        }
    }

    /// Rotate an account's session token and persist the change
    ///
    /// The generate/check loop makes collisions all but impossible, but it
    /// is not atomic with the write; if a concurrent writer claims the same
    /// token first, the store reports a unique-violation and one fresh
    /// token is generated and retried. Any other store failure is fatal to
    /// the call.
    ///
    /// # Returns
    ///
    /// * `String` - The new token (also written back into `account`)
    ///
    /// # Errors
    ///
    /// * `AuthError::Store` - The account is unsaved or the update failed
    pub async fn reset_session_token(&self, account: &mut UserAccount) -> AuthResult<String> {
        let token = self.generate_unique_session_token().await?;
        match self.persist_token(account, &token).await {
            Ok(updated) => {
                *account = updated;
                log::info!("rotated session token for account {}", account.username);
                Ok(token)
            }
            Err(StoreError::UniqueViolation(AccountField::SessionToken)) => {
                log::warn!(
                    "session token collided at write time for account {}; regenerating",
                    account.username
                );
                let token = self.generate_unique_session_token().await?;
                let updated = self.persist_token(account, &token).await?;
                *account = updated;
                Ok(token)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Register a new account: prepare, validate, and create
    ///
    /// The explicit prepare-then-create path. The store may still reject
    /// the write with a unique-violation if a concurrent registration won
    /// the race after the pre-checks; as with rotation, a session-token
    /// collision gets one fresh token and one more create, while any other
    /// violation (username, email) is the caller's to resolve.
    ///
    /// # Errors
    ///
    /// * `AuthError::Invalid` - Validation violations, all collected
    /// * `AuthError::Store` - The create failed
    pub async fn register(
        &self,
        candidate: UserAccount,
        raw_password: &str,
    ) -> AuthResult<UserAccount> {
        let mut prepared = self.validate_and_prepare(candidate, Some(raw_password)).await?;
        let created = match self.store.create(prepared.clone()).await {
            Ok(created) => created,
            Err(StoreError::UniqueViolation(AccountField::SessionToken)) => {
                log::warn!(
                    "session token collided at write time for account {}; regenerating",
                    prepared.username
                );
                prepared.session_token = Some(self.generate_unique_session_token().await?);
                self.store.create(prepared).await?
            }
            Err(err) => return Err(err.into()),
        };
        log::info!("registered account {}", created.username);
        Ok(created)
    }

    /// Re-digest an account's password and persist the change
    ///
    /// # Errors
    ///
    /// * `AuthError::Invalid` - The new password fails the length bounds
    /// * `AuthError::Store` - The account is unsaved or the update failed
    pub async fn update_password(
        &self,
        account: &mut UserAccount,
        raw_password: &str,
    ) -> AuthResult<()> {
        let mut errors = Vec::new();
        check_raw_password(raw_password, &mut errors);
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }

        let digest = self.hasher.hash(raw_password)?;
        let updated = self
            .store
            .update(
                account,
                AccountChanges {
                    password_digest: Some(digest),
                    ..Default::default()
                },
            )
            .await?;
        *account = updated;
        Ok(())
    }

    /// Change an account's email address and persist the change
    ///
    /// The new address must satisfy the email grammar and length bounds;
    /// the store's unique constraint decides whether it is free.
    ///
    /// # Errors
    ///
    /// * `AuthError::Invalid` - The new address fails the format checks
    /// * `AuthError::Store` - The account is unsaved, the update failed, or
    ///   another account already holds the address
    pub async fn update_email(&self, account: &mut UserAccount, email: &str) -> AuthResult<()> {
        let mut errors = Vec::new();
        check_email(email, &mut errors);
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }

        let updated = self
            .store
            .update(
                account,
                AccountChanges {
                    email: Some(email.to_string()),
                    ..Default::default()
                },
            )
            .await?;
        *account = updated;
        Ok(())
    }

    /// Generate a session token no account currently holds
    ///
    /// Loops until the store's existence check comes back clean; with 24
    /// random bytes per attempt a second pass is effectively unreachable,
    /// so the loop carries no retry bound.
    async fn generate_unique_session_token(&self) -> AuthResult<String> {
        loop {
            let token = random_session_token();
            if !self
                .store
                .exists_with(AccountField::SessionToken, &token)
                .await?
            {
                return Ok(token);
            }
        }
    }

    async fn persist_token(
        &self,
        account: &UserAccount,
        token: &str,
    ) -> Result<UserAccount, StoreError> {
        self.store
            .update(
                account,
                AccountChanges {
                    session_token: Some(token.to_string()),
                    ..Default::default()
                },
            )
            .await
    }

    /// Report a uniqueness violation unless the only holder is the
    /// candidate's own row
    async fn check_unique(
        &self,
        field: AccountField,
        value: &str,
        candidate: &UserAccount,
        errors: &mut Vec<ValidationError>,
    ) -> AuthResult<()> {
        if value.is_empty() {
            return Ok(());
        }
        if let Some(existing) = self.store.find_one(field, value).await? {
            if candidate.id.is_none() || existing.id != candidate.id {
                errors.push(ValidationError::new(field.column(), "has already been taken"));
            }
        }
        Ok(())
    }
}

/// 24 random bytes, base64-encoded
fn random_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}
