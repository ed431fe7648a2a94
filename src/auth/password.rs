// Password hashing and verification

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::auth::error::AuthError;

/// Password service wrapping Argon2id
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a random salt
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    /// Verify a password against a stored PHC-format hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHashError)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = PasswordService::hash_password("secret").unwrap();
        assert!(PasswordService::verify_password("secret", &hash).unwrap());
        assert!(!PasswordService::verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = PasswordService::hash_password("secret").unwrap();
        let second = PasswordService::hash_password("secret").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_plaintext_never_appears_in_hash() {
        let hash = PasswordService::hash_password("hunter2hunter2").unwrap();
        assert!(!hash.contains("hunter2hunter2"));
    }

    #[test]
    fn test_malformed_hash_is_rejected() {
        assert!(PasswordService::verify_password("secret", "not-a-phc-hash").is_err());
    }
}
