//! PostgreSQL store implementation.
//!
//! Reference [`UserStore`] backed by sqlx. Expects an `accounts` table with
//! unique indexes on `username`, `email`, `session_token`, and
//! `password_digest`; those indexes are what make write-time uniqueness
//! authoritative.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use super::{AccountField, DatabaseConfig, StoreError, StoreResult, UserStore};
use crate::auth::models::{AccountChanges, UserAccount};

/// PostgreSQL-backed account store
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Wrap an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool from configuration
    ///
    /// # Errors
    ///
    /// * `sqlx::Error` - Pool could not be established
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn row_to_account(row: &PgRow) -> UserAccount {
    UserAccount {
        id: Some(row.get("id")),
        email: row.get("email"),
        username: row.get("username"),
        password_digest: row.get("password_digest"),
        session_token: Some(row.get("session_token")),
        created_at: Some(row.get::<chrono::NaiveDateTime, _>("created_at").and_utc()),
        updated_at: Some(row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc()),
    }
}

/// Map a constraint name like `accounts_session_token_key` to its column
fn constraint_field(constraint: &str) -> Option<AccountField> {
    [
        AccountField::SessionToken,
        AccountField::PasswordDigest,
        AccountField::Username,
        AccountField::Email,
    ]
    .into_iter()
    .find(|field| constraint.contains(field.column()))
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            if let Some(field) = db.constraint().and_then(constraint_field) {
                return StoreError::UniqueViolation(field);
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_one(&self, field: AccountField, value: &str) -> StoreResult<Option<UserAccount>> {
        let query = match field {
            AccountField::Email => {
                "SELECT id, email, username, password_digest, session_token, created_at, updated_at
                 FROM accounts WHERE email = $1"
            }
            AccountField::Username => {
                "SELECT id, email, username, password_digest, session_token, created_at, updated_at
                 FROM accounts WHERE username = $1"
            }
            AccountField::SessionToken => {
                "SELECT id, email, username, password_digest, session_token, created_at, updated_at
                 FROM accounts WHERE session_token = $1"
            }
            AccountField::PasswordDigest => {
                "SELECT id, email, username, password_digest, session_token, created_at, updated_at
                 FROM accounts WHERE password_digest = $1"
            }
        };

        let row = sqlx::query(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_account))
    }

    async fn exists_with(&self, field: AccountField, value: &str) -> StoreResult<bool> {
        let query = match field {
            AccountField::Email => "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)",
            AccountField::Username => "SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)",
            AccountField::SessionToken => {
                "SELECT EXISTS(SELECT 1 FROM accounts WHERE session_token = $1)"
            }
            AccountField::PasswordDigest => {
                "SELECT EXISTS(SELECT 1 FROM accounts WHERE password_digest = $1)"
            }
        };

        let row = sqlx::query(query).bind(value).fetch_one(&self.pool).await?;
        Ok(row.get(0))
    }

    async fn create(&self, account: UserAccount) -> StoreResult<UserAccount> {
        let row = sqlx::query(
            "INSERT INTO accounts (email, username, password_digest, session_token)
             VALUES ($1, $2, $3, $4)
             RETURNING id, email, username, password_digest, session_token,
                       created_at, updated_at",
        )
        .bind(&account.email)
        .bind(&account.username)
        .bind(&account.password_digest)
        .bind(account.session_token.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row_to_account(&row))
    }

    async fn update(
        &self,
        account: &UserAccount,
        changes: AccountChanges,
    ) -> StoreResult<UserAccount> {
        let id = account.id.ok_or(StoreError::NotFound)?;

        let row = sqlx::query(
            "UPDATE accounts SET
                 email = COALESCE($2, email),
                 password_digest = COALESCE($3, password_digest),
                 session_token = COALESCE($4, session_token),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING id, email, username, password_digest, session_token,
                       created_at, updated_at",
        )
        .bind(id)
        .bind(changes.email)
        .bind(changes.password_digest)
        .bind(changes.session_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.as_ref().map(row_to_account).ok_or(StoreError::NotFound)
    }
}
