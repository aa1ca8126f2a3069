//! bcrypt implementation of the PasswordHasher port.
//!
//! Hashing is CPU-bound and runs on the blocking thread pool so it never
//! stalls the async workers.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::PasswordHasher;

/// bcrypt password hasher with a fixed cost factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &SecretString) -> Result<String, DomainError> {
        let plaintext = plaintext.clone();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext.expose_secret(), cost))
            .await
            .map_err(|e| DomainError::new(ErrorCode::InternalError, format!("Hashing task failed: {}", e)))?
            .map_err(|e| DomainError::new(ErrorCode::InternalError, format!("Failed to hash password: {}", e)))
    }

    async fn verify(&self, plaintext: &SecretString, digest: &str) -> Result<bool, DomainError> {
        let plaintext = plaintext.clone();
        let digest = digest.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext.expose_secret(), &digest))
            .await
            .map_err(|e| DomainError::new(ErrorCode::InternalError, format!("Verification task failed: {}", e)))?
            .map_err(|e| DomainError::new(ErrorCode::InternalError, format!("Failed to verify password: {}", e)))
    }
}
