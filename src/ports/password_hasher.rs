//! Password hasher port.
//!
//! One-way, per-call salted hashing. The cost factor belongs to the
//! implementation and cannot be chosen per call.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::foundation::DomainError;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password with a fresh random salt.
    async fn hash(&self, plaintext: &SecretString) -> Result<String, DomainError>;

    /// Checks a plaintext password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`. A digest that cannot be parsed is an error.
    async fn verify(&self, plaintext: &SecretString, digest: &str) -> Result<bool, DomainError>;
}
