use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

/// Longest password accepted, in bytes. Matches the bcrypt limit so stored
/// credentials stay portable between schemes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("password exceeds {MAX_PASSWORD_BYTES} bytes")]
    InputTooLong,
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(password_hash::Error),
    #[error("password hashing failed: {0}")]
    Failed(password_hash::Error),
}

/// Argon2id with the crate's default cost parameters and a fresh salt per hash.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(&self, plain: &str) -> Result<String, HashError> {
        if plain.len() > MAX_PASSWORD_BYTES {
            return Err(HashError::InputTooLong);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                HashError::Failed(e)
            })?
            .to_string();
        Ok(hash)
    }

    pub fn verify(&self, plain: &str, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            HashError::MalformedHash(e)
        })?;
        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = PasswordHasher::new();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash("correct-horse").unwrap();
        let b = hasher.hash("correct-horse").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("correct-horse", &a).unwrap());
        assert!(hasher.verify("correct-horse", &b).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("correct-horse-battery-staple").unwrap();
        assert!(!hasher.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = PasswordHasher::new()
            .verify("anything", "not-a-valid-hash")
            .unwrap_err();
        assert!(matches!(err, HashError::MalformedHash(_)));
    }

    #[test]
    fn rejects_input_over_limit() {
        let hasher = PasswordHasher::new();
        let too_long = "x".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(matches!(hasher.hash(&too_long), Err(HashError::InputTooLong)));

        let at_limit = "x".repeat(MAX_PASSWORD_BYTES);
        assert!(hasher.hash(&at_limit).is_ok());
    }
}
