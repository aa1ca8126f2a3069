//! Shared mock ports for handler tests.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::adapters::auth::JwtTokenSigner;
use crate::adapters::cache::InMemoryTokenBlacklist;
use crate::adapters::memory::InMemoryCredentialStore;
use crate::config::JwtAlgorithm;
use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
use crate::ports::{PasswordHasher, TokenBlacklist};

pub const TEST_SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

/// Reversible "hash" so tests skip bcrypt's cost.
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, plaintext: &SecretString) -> Result<String, DomainError> {
        Ok(format!("plain:{}", plaintext.expose_secret()))
    }

    async fn verify(&self, plaintext: &SecretString, digest: &str) -> Result<bool, DomainError> {
        Ok(digest == format!("plain:{}", plaintext.expose_secret()))
    }
}

pub struct FailingHasher;

#[async_trait]
impl PasswordHasher for FailingHasher {
    async fn hash(&self, _plaintext: &SecretString) -> Result<String, DomainError> {
        Err(DomainError::internal("hash worker panicked"))
    }

    async fn verify(&self, _plaintext: &SecretString, _digest: &str) -> Result<bool, DomainError> {
        Err(DomainError::internal("hash worker panicked"))
    }
}

/// Blacklist whose writes always fail.
pub struct BrokenBlacklist;

#[async_trait]
impl TokenBlacklist for BrokenBlacklist {
    async fn put(&self, _token: &str, _account_id: AccountId, _ttl_secs: u64) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "connection refused"))
    }

    async fn exists(&self, _token: &str) -> Result<bool, DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "connection refused"))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::CacheError, "connection refused"))
    }
}

pub fn signer() -> Arc<JwtTokenSigner> {
    Arc::new(JwtTokenSigner::new(
        &SecretString::new(TEST_SECRET.to_string()),
        JwtAlgorithm::Hs256,
        3600,
    ))
}

pub struct Ports {
    pub store: InMemoryCredentialStore,
    pub blacklist: InMemoryTokenBlacklist,
    pub signer: Arc<JwtTokenSigner>,
}

impl Ports {
    pub fn new() -> Self {
        Self {
            store: InMemoryCredentialStore::new(),
            blacklist: InMemoryTokenBlacklist::new(),
            signer: signer(),
        }
    }
}

pub fn secret(value: &str) -> Option<SecretString> {
    Some(SecretString::new(value.to_string()))
}
