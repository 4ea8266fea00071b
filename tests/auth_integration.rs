//! Integration tests for the authentication flows.
//!
//! Runs registration, login, token rotation, and password change against the
//! in-memory store, which enforces the same write-time constraints as the
//! PostgreSQL store.

use std::sync::Arc;

use account_auth::{
    AccountAuthenticator, AccountField, Argon2Hasher, AuthError, MemoryUserStore, StoreError,
    UserAccount,
};

/// Helper to create an authenticator over a fresh in-memory store
fn setup_auth() -> AccountAuthenticator<MemoryUserStore> {
    AccountAuthenticator::new(Arc::new(MemoryUserStore::new()), Arc::new(Argon2Hasher))
        .expect("Failed to create authenticator")
}

#[tokio::test]
async fn test_register_assigns_token_and_digest() {
    let auth = setup_auth();

    let account = auth
        .register(UserAccount::new("alice", "alice@example.com"), "hunter22")
        .await
        .expect("Registration should succeed");

    assert!(account.id.is_some(), "Store should assign an id");
    let token = account.session_token.as_deref().expect("Token should be issued");
    assert!(token.len() >= 32, "Token should be at least 32 chars");
    assert!(
        account.password_digest.starts_with("$argon2"),
        "Password should be digested, not stored raw"
    );
}

#[tokio::test]
async fn test_login_by_username_and_by_email() {
    let auth = setup_auth();
    auth.register(UserAccount::new("alice", "alice@example.com"), "hunter22")
        .await
        .unwrap();

    let by_username = auth
        .find_by_credentials("alice", "hunter22")
        .await
        .expect("Lookup should not error");
    assert!(by_username.is_some(), "Username credential should authenticate");

    let by_email = auth
        .find_by_credentials("alice@example.com", "hunter22")
        .await
        .expect("Lookup should not error");
    assert!(by_email.is_some(), "Email credential should authenticate");

    assert_eq!(
        by_username.unwrap().id,
        by_email.unwrap().id,
        "Both credentials should resolve to the same account"
    );
}

#[tokio::test]
async fn test_wrong_password_and_unknown_credential_look_identical() {
    let auth = setup_auth();
    auth.register(UserAccount::new("alice", "alice@example.com"), "hunter22")
        .await
        .unwrap();

    let wrong_password = auth.find_by_credentials("alice", "not-the-password").await.unwrap();
    let unknown = auth.find_by_credentials("nobody", "not-the-password").await.unwrap();

    assert!(wrong_password.is_none(), "Wrong password should return None");
    assert!(unknown.is_none(), "Unknown credential should return None");
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let auth = setup_auth();
    auth.register(UserAccount::new("alice", "alice@example.com"), "hunter22")
        .await
        .unwrap();

    let result = auth
        .register(UserAccount::new("alice", "alice2@example.com"), "different-pw")
        .await;

    let Err(AuthError::Invalid(errors)) = result else {
        panic!("Duplicate username should fail validation");
    };
    assert!(
        errors.iter().any(|e| e.field == "username" && e.message == "has already been taken"),
        "Should report the username as taken"
    );
}

#[tokio::test]
async fn test_email_shaped_username_is_rejected() {
    let auth = setup_auth();

    let result = auth
        .register(UserAccount::new("bob@x.com", "bob@x.com"), "hunter22")
        .await;

    let Err(AuthError::Invalid(errors)) = result else {
        panic!("Email-shaped username should fail validation");
    };
    assert!(
        errors.iter().any(|e| e.field == "username" && e.message == "can't be an email"),
        "Should report that a username can't be an email"
    );
}

#[tokio::test]
async fn test_short_inputs_are_all_reported_at_once() {
    let auth = setup_auth();

    let result = auth.register(UserAccount::new("ab", "a@"), "12345").await;

    let Err(AuthError::Invalid(errors)) = result else {
        panic!("Invalid candidate should fail validation");
    };
    let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
    assert!(fields.contains(&"username"), "Short username should be reported");
    assert!(fields.contains(&"email"), "Malformed email should be reported");
    assert!(fields.contains(&"password"), "Short password should be reported");
}

#[tokio::test]
async fn test_reset_session_token_rotates() {
    let auth = setup_auth();
    let mut account = auth
        .register(UserAccount::new("alice", "alice@example.com"), "hunter22")
        .await
        .unwrap();
    let original = account.session_token.clone().unwrap();

    let first = auth
        .reset_session_token(&mut account)
        .await
        .expect("First rotation should succeed");
    let second = auth
        .reset_session_token(&mut account)
        .await
        .expect("Second rotation should succeed");

    assert_ne!(first, original, "Rotation should replace the original token");
    assert_ne!(second, first, "Consecutive rotations should differ");
    assert_eq!(
        account.session_token.as_deref(),
        Some(second.as_str()),
        "Account should carry the latest token"
    );
}

#[tokio::test]
async fn test_rotated_token_is_unique_across_accounts() {
    let auth = setup_auth();
    let alice = auth
        .register(UserAccount::new("alice", "alice@example.com"), "hunter22")
        .await
        .unwrap();
    let mut bob = auth
        .register(UserAccount::new("bob", "bob@example.com"), "hunter23")
        .await
        .unwrap();

    let token = auth.reset_session_token(&mut bob).await.unwrap();
    assert_ne!(
        Some(token.as_str()),
        alice.session_token.as_deref(),
        "Rotated token should not belong to another account"
    );
}

#[tokio::test]
async fn test_update_password_redigests() {
    let auth = setup_auth();
    let mut account = auth
        .register(UserAccount::new("alice", "alice@example.com"), "old-password")
        .await
        .unwrap();

    auth.update_password(&mut account, "new-password")
        .await
        .expect("Password change should succeed");

    let old = auth.find_by_credentials("alice", "old-password").await.unwrap();
    assert!(old.is_none(), "Old password should no longer authenticate");

    let new = auth.find_by_credentials("alice", "new-password").await.unwrap();
    assert!(new.is_some(), "New password should authenticate");
}

#[tokio::test]
async fn test_update_password_rejects_short_password() {
    let auth = setup_auth();
    let mut account = auth
        .register(UserAccount::new("alice", "alice@example.com"), "hunter22")
        .await
        .unwrap();

    let result = auth.update_password(&mut account, "12345").await;
    assert!(
        matches!(result, Err(AuthError::Invalid(_))),
        "Five-char password should be rejected"
    );
}

#[tokio::test]
async fn test_update_email_changes_the_login_credential() {
    let auth = setup_auth();
    let mut account = auth
        .register(UserAccount::new("alice", "alice@example.com"), "hunter22")
        .await
        .unwrap();

    auth.update_email(&mut account, "alice@new-domain.com")
        .await
        .expect("Email change should succeed");
    assert_eq!(account.email, "alice@new-domain.com");

    let by_new = auth
        .find_by_credentials("alice@new-domain.com", "hunter22")
        .await
        .unwrap();
    assert!(by_new.is_some(), "New address should authenticate");

    let by_old = auth
        .find_by_credentials("alice@example.com", "hunter22")
        .await
        .unwrap();
    assert!(by_old.is_none(), "Old address should no longer resolve");
}

#[tokio::test]
async fn test_update_email_rejects_malformed_address() {
    let auth = setup_auth();
    let mut account = auth
        .register(UserAccount::new("alice", "alice@example.com"), "hunter22")
        .await
        .unwrap();

    let result = auth.update_email(&mut account, "not-an-address").await;
    assert!(
        matches!(result, Err(AuthError::Invalid(_))),
        "Malformed address should be rejected"
    );
    assert_eq!(account.email, "alice@example.com", "Account should be unchanged");
}

#[tokio::test]
async fn test_update_email_rejects_taken_address() {
    let auth = setup_auth();
    auth.register(UserAccount::new("alice", "alice@example.com"), "hunter22")
        .await
        .unwrap();
    let mut bob = auth
        .register(UserAccount::new("bob", "bob@example.com"), "hunter23")
        .await
        .unwrap();

    let result = auth.update_email(&mut bob, "alice@example.com").await;
    assert!(
        matches!(
            result,
            Err(AuthError::Store(StoreError::UniqueViolation(AccountField::Email)))
        ),
        "A taken address should surface the store's unique violation"
    );
}

#[tokio::test]
async fn test_prepare_leaves_existing_token_alone() {
    let auth = setup_auth();
    let mut candidate = UserAccount::new("alice", "alice@example.com");
    candidate.session_token = Some("caller-chosen-token-of-decent-len".to_string());

    let prepared = auth
        .validate_and_prepare(candidate, Some("hunter22"))
        .await
        .expect("Candidate with preset token should validate");

    assert_eq!(
        prepared.session_token.as_deref(),
        Some("caller-chosen-token-of-decent-len"),
        "Preset token should not be replaced"
    );
}
