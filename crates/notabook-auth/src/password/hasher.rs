//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use notabook_core::error::AppError;

/// Fixed salt for [`PasswordHasher::verify_missing`].
const DUMMY_SALT: &[u8] = b"notabook-no-such-user";

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password with a fresh random salt. Returns a PHC
    /// string.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// A malformed stored hash counts as a mismatch so that a corrupt row
    /// can never be logged into.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Spends the same Argon2 work as [`Self::verify_password`] when there is
    /// no stored hash to check against. Always returns `false`.
    pub fn verify_missing(&self, password: &str) -> bool {
        let mut output = [0u8; 32];
        let _ = Argon2::default().hash_password_into(password.as_bytes(), DUMMY_SALT, &mut output);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("secreto1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("secreto1", &hash));
        assert!(!hasher.verify_password("secreto2", &hash));
    }

    #[test]
    fn test_salted() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash_password("same").unwrap();
        let b = hasher.hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_hash_never_verifies() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_missing("secreto1"));
        assert!(!hasher.verify_missing(""));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!PasswordHasher::new().verify_password("x", "not-a-hash"));
    }
}
