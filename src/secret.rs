//! Deletion password hashing for anonboard.
//!
//! Every thread and reply carries a one-way hash of the password its author
//! chose. The [`SecretVerifier`] trait keeps the hashing primitive pluggable;
//! [`Argon2Verifier`] is the production implementation (Argon2id).

use std::fmt;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;

use crate::config::SecretConfig;
use crate::{AnonboardError, Result};

/// A one-way hashed deletion password in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedSecret(String);

impl HashedSecret {
    /// Wrap a stored hash string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The PHC string, for persistence.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedSecret(<redacted>)")
    }
}

/// One-way hashing and verification of deletion passwords.
pub trait SecretVerifier: Send + Sync {
    /// Hash a password for storage.
    fn hash(&self, secret: &str) -> Result<HashedSecret>;

    /// Check a password against a stored hash.
    ///
    /// Never fails: a malformed stored hash simply does not verify.
    fn verify(&self, secret: &str, hashed: &HashedSecret) -> bool;
}

/// Argon2id implementation of [`SecretVerifier`].
pub struct Argon2Verifier {
    params: Params,
}

impl Argon2Verifier {
    /// Create a verifier with the configured cost parameters.
    pub fn new(config: &SecretConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AnonboardError::Config(format!("invalid secret parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl SecretVerifier for Argon2Verifier {
    fn hash(&self, secret: &str) -> Result<HashedSecret> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AnonboardError::Secret(e.to_string()))?;
        Ok(HashedSecret(hash.to_string()))
    }

    fn verify(&self, secret: &str, hashed: &HashedSecret) -> bool {
        let parsed = match PasswordHash::new(hashed.as_str()) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        // Cost parameters come from the stored hash, not from self.params.
        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
pub(crate) fn test_verifier() -> Argon2Verifier {
    Argon2Verifier::new(&SecretConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid test parameters")
}
