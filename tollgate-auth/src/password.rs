// Password hashing and verification for login

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored hash is unusable: {0}")]
    MalformedHash(String),
}

/// Password hashing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Bcrypt,
    /// Default for new hashes
    Argon2,
}

/// Hashes new passwords and verifies stored ones.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    algorithm: HashAlgorithm,
}

impl PasswordHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self.algorithm {
            HashAlgorithm::Bcrypt => bcrypt::hash(password, bcrypt::DEFAULT_COST)
                .map_err(|e| PasswordError::Hash(e.to_string())),
            HashAlgorithm::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| PasswordError::Hash(e.to_string()))
            }
        }
    }

    /// Check `password` against a stored hash. The format (bcrypt or
    /// argon2) is detected from the hash itself.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if hash.starts_with("$2") {
            bcrypt::verify(password, hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))
        } else if hash.starts_with("$argon2") {
            let parsed = PasswordHash::new(hash)
                .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok())
        } else {
            Err(PasswordError::MalformedHash("unknown hash format".to_string()))
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::Argon2)
    }
}
