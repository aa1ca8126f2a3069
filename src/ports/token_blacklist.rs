//! Access-token blacklist port.
//!
//! A key-value store with per-key expiry that records retired access tokens.
//! Entries disappear on their own once the TTL lapses; nothing deletes them
//! explicitly.

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError};

#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Records `token` as retired for `ttl_secs`, overwriting any prior entry.
    async fn put(&self, token: &str, account_id: AccountId, ttl_secs: u64)
        -> Result<(), DomainError>;

    /// Returns true while an unexpired entry for `token` exists.
    async fn exists(&self, token: &str) -> Result<bool, DomainError>;

    /// Checks that the backing store answers. Used by health checks.
    async fn ping(&self) -> Result<(), DomainError>;
}
