//! Argon2id password hashing.
//!
//! # Invariants
//! - Stored hashes are PHC strings with a fresh random salt per hash.
//! - Verification reads cost parameters from the stored hash, so changing
//!   `HashingConfig` never locks out existing accounts.
//! - Raw passwords and hashes are never logged.

use crate::config::{ConfigError, HashingConfig};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, PasswordHasher, PasswordVerifier, Version};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Password hashing failure.
#[derive(Debug)]
pub struct PasswordHashError(argon2::password_hash::Error);

impl Display for PasswordHashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password hashing failed: {}", self.0)
    }
}

impl Error for PasswordHashError {}

/// Configured Argon2id hasher.
#[derive(Clone)]
pub struct PasswordHashing {
    argon2: Argon2<'static>,
}

impl PasswordHashing {
    pub fn new(config: HashingConfig) -> Result<Self, ConfigError> {
        let params = config.to_params()?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes `raw_password` into a PHC string.
    pub fn hash(&self, raw_password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(PasswordHashError)?;
        Ok(hash.to_string())
    }

    /// Returns whether `raw_password` matches `stored_hash`.
    ///
    /// An unparsable stored hash counts as a mismatch.
    pub fn verify(&self, raw_password: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(
                    "event=password_verify module=auth status=error error_code=invalid_stored_hash error={}",
                    err
                );
                return false;
            }
        };

        self.argon2
            .verify_password(raw_password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for PasswordHashing {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PasswordHashing;
    use crate::config::HashingConfig;

    fn cheap() -> PasswordHashing {
        PasswordHashing::new(HashingConfig::new(64, 1, 1).unwrap()).unwrap()
    }

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hashing = cheap();
        let hash = hashing.hash("secret1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secret1"));
        assert!(hashing.verify("secret1", &hash));
        assert!(!hashing.verify("secret2", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hashing = cheap();
        let first = hashing.hash("secret1").unwrap();
        let second = hashing.hash("secret1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verification_uses_parameters_embedded_in_the_hash() {
        let old = cheap();
        let hash = old.hash("secret1").unwrap();
        let newer = PasswordHashing::new(HashingConfig::new(128, 2, 1).unwrap()).unwrap();
        assert!(newer.verify("secret1", &hash));
    }

    #[test]
    fn malformed_stored_hash_is_a_mismatch() {
        let hashing = cheap();
        // Legacy unsalted sha-256 hex digest.
        let legacy = "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";
        assert!(!hashing.verify("admin123", legacy));
    }
}
