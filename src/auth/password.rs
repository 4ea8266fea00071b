//! Password hashing seam.
//!
//! The authenticator talks to a [`PasswordHasher`] trait so deployments can
//! substitute their own scheme; [`Argon2Hasher`] is the default.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
};

use super::errors::HashError;

/// Trait for password hashing and verification
pub trait PasswordHasher: Send + Sync {
    /// Hash a raw password into a storable digest
    fn hash(&self, raw_password: &str) -> Result<String, HashError>;

    /// Verify a raw password against a stored digest
    ///
    /// Malformed digests verify as `false`; verification never errors.
    fn verify(&self, raw_password: &str, digest: &str) -> bool;
}

/// Argon2id password hasher producing PHC-format digests
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, raw_password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(raw_password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|_| HashError)
    }

    fn verify(&self, raw_password: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        Argon2::default()
            .verify_password(raw_password.as_bytes(), &parsed)
            .is_ok()
    }
}
