//! In-memory store implementation.
//!
//! Backs the authenticator without a database. Enforces the same unique and
//! not-null constraints `PgUserStore` gets from the schema, so tests exercise
//! the real write-time failure paths.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{AccountField, StoreError, StoreResult, UserStore};
use crate::auth::models::{AccountChanges, AccountId, UserAccount};

const UNIQUE_FIELDS: [AccountField; 4] = [
    AccountField::Username,
    AccountField::Email,
    AccountField::SessionToken,
    AccountField::PasswordDigest,
];

/// In-memory account store
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<AccountId, UserAccount>,
    next_id: AccountId,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn field_value<'a>(account: &'a UserAccount, field: AccountField) -> &'a str {
    match field {
        AccountField::Email => &account.email,
        AccountField::Username => &account.username,
        AccountField::SessionToken => account.session_token.as_deref().unwrap_or(""),
        AccountField::PasswordDigest => &account.password_digest,
    }
}

impl Inner {
    /// First unique column of `account` already held by another row, if any
    fn unique_conflict(
        &self,
        account: &UserAccount,
        own_id: Option<AccountId>,
    ) -> Option<AccountField> {
        UNIQUE_FIELDS.into_iter().find(|&field| {
            let value = field_value(account, field);
            self.accounts
                .values()
                .any(|other| other.id != own_id && field_value(other, field) == value)
        })
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_one(&self, field: AccountField, value: &str) -> StoreResult<Option<UserAccount>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .accounts
            .values()
            .find(|account| field_value(account, field) == value)
            .cloned())
    }

    async fn exists_with(&self, field: AccountField, value: &str) -> StoreResult<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .accounts
            .values()
            .any(|account| field_value(account, field) == value))
    }

    async fn create(&self, mut account: UserAccount) -> StoreResult<UserAccount> {
        let mut inner = self.inner.lock().unwrap();

        for field in UNIQUE_FIELDS {
            if field_value(&account, field).is_empty() {
                return Err(StoreError::NullViolation(field));
            }
        }
        if let Some(field) = inner.unique_conflict(&account, None) {
            return Err(StoreError::UniqueViolation(field));
        }

        let id = inner.next_id + 1;
        inner.next_id = id;
        let now = Utc::now();
        account.id = Some(id);
        account.created_at = Some(now);
        account.updated_at = Some(now);
        inner.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn update(
        &self,
        account: &UserAccount,
        changes: AccountChanges,
    ) -> StoreResult<UserAccount> {
        let id = account.id.ok_or(StoreError::NotFound)?;
        let mut inner = self.inner.lock().unwrap();

        let mut updated = inner.accounts.get(&id).ok_or(StoreError::NotFound)?.clone();
        if let Some(email) = changes.email {
            updated.email = email;
        }
        if let Some(digest) = changes.password_digest {
            updated.password_digest = digest;
        }
        if let Some(token) = changes.session_token {
            updated.session_token = Some(token);
        }

        for field in UNIQUE_FIELDS {
            if field_value(&updated, field).is_empty() {
                return Err(StoreError::NullViolation(field));
            }
        }
        if let Some(field) = inner.unique_conflict(&updated, Some(id)) {
            return Err(StoreError::UniqueViolation(field));
        }

        updated.updated_at = Some(Utc::now());
        inner.accounts.insert(id, updated.clone());
        Ok(updated)
    }
}
