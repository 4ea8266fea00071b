//! Pool configuration for the PostgreSQL-backed store.

use std::env;
use std::fmt::Debug;
use std::str::FromStr;

/// Knobs forwarded to [`PgPoolOptions`](sqlx::postgres::PgPoolOptions) by
/// [`PgUserStore::connect`](super::PgUserStore::connect).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Minimum number of pooled connections
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub connection_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

/// Read an environment variable, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse as `T`.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|err| panic!("{key} is not valid: {err:?}")),
        Err(_) => default,
    }
}

impl DatabaseConfig {
    /// Build a configuration from the environment.
    ///
    /// `DATABASE_URL` is required. Pool sizing falls back to the defaults in
    /// [`DatabaseConfig::default`] via `DB_MAX_CONNECTIONS`,
    /// `DB_MIN_CONNECTIONS`, `DB_CONNECTION_TIMEOUT`, `DB_IDLE_TIMEOUT`, and
    /// `DB_MAX_LIFETIME`.
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is unset or any override fails to parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections),
            connection_timeout_secs: env_or("DB_CONNECTION_TIMEOUT", defaults.connection_timeout_secs),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT", defaults.idle_timeout_secs),
            max_lifetime_secs: env_or("DB_MAX_LIFETIME", defaults.max_lifetime_secs),
        }
    }
}

impl Default for DatabaseConfig {
    /// Local development defaults: a small pool against
    /// `postgres://postgres@localhost/account_auth_dev`.
    fn default() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/account_auth_dev".to_string(),
            max_connections: 5,
            min_connections: 1,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}
