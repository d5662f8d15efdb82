//! Password hashing and verification using Argon2

use crate::utils::error::{PlatformError, Result};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Checks a presented password against a stored hash
pub trait CredentialVerifier: Send + Sync {
    /// `Ok(false)` for a wrong password; `Err` only when the check itself failed
    fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Argon2id verifier with default parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Verifier;

impl Argon2Verifier {
    pub fn new() -> Self {
        Self
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        hash_password(password)
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        verify_password(password, hash)
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PlatformError::crypto(format!("Failed to hash password: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PlatformError::crypto(format!("Failed to parse password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PlatformError::crypto(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}
