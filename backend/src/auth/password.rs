//! Argon2id hashing for passwords and refresh tokens.
//!
//! Hashes are PHC strings with the salt embedded, so hashing the same input
//! twice yields two different strings that both verify.

use crate::errors::{ServiceError, ServiceResult};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// One-way hasher for stored credentials.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext value with a fresh random salt
    ///
    /// # Errors
    /// Returns `ServiceError::InternalError` if argon2 cannot produce a hash
    pub fn hash(&self, plaintext: &str) -> ServiceResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::internal_error(format!("Hashing failed: {}", e)))
    }

    /// Verify a plaintext value against a stored hash
    ///
    /// # Returns
    /// `true` on match, `false` on mismatch
    ///
    /// # Errors
    /// Returns `ServiceError::MalformedHash` if `hash` is not a valid PHC string
    pub fn verify(&self, hash: &str, plaintext: &str) -> ServiceResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|_| ServiceError::MalformedHash)?;
        Ok(self
            .argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "correct horse").unwrap());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("pw1").unwrap();
        assert!(!hasher.verify(&hash, "pw2").unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new();
        let first = hasher.hash("same-input").unwrap();
        let second = hasher.hash("same-input").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(&first, "same-input").unwrap());
        assert!(hasher.verify(&second, "same-input").unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("not-a-phc-string", "anything");
        assert!(matches!(result, Err(ServiceError::MalformedHash)));
    }
}
