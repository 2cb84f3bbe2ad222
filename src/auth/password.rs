//! Password hashing and verification using bcrypt

use crate::core::error::{AppError, Result, ValidationErrors};

/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt hasher with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password; every call embeds a fresh random salt.
    ///
    /// Passwords longer than `MAX_PASSWORD_BYTES` are refused rather than truncated.
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            let mut errors = ValidationErrors::new();
            errors.add(
                "password",
                format!("must be at most {} bytes", MAX_PASSWORD_BYTES),
            );
            return Err(AppError::ValidationError(errors));
        }

        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Check a password against a stored hash.
    ///
    /// A hash that bcrypt cannot parse counts as a mismatch, and so does a
    /// password too long to have been hashed without truncation.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }

        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a valid bcrypt hash");
                false
            }
        }
    }

    /// `hash` on the blocking pool; bcrypt is deliberately slow
    pub async fn hash_blocking(&self, password: String) -> Result<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task panicked: {}", e)))?
    }

    /// `verify` on the blocking pool
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<bool> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Verification task panicked: {}", e)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
