//! In-memory token blacklist for testing and single-server development.
//!
//! Entries are checked lazily against their deadline, so an expired entry
//! reads as absent even before it is pruned.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::domain::foundation::{AccountId, DomainError};
use crate::ports::TokenBlacklist;

#[derive(Debug, Clone)]
struct Entry {
    account_id: AccountId,
    expires_at: Instant,
}

/// In-memory token blacklist.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenBlacklist {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryTokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the owning account of a live entry.
    pub async fn owner_of(&self, token: &str) -> Option<AccountId> {
        let entries = self.entries.read().await;
        entries
            .get(token)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.account_id)
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|entry| entry.expires_at > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TokenBlacklist for InMemoryTokenBlacklist {
    async fn put(&self, token: &str, account_id: AccountId, ttl_secs: u64) -> Result<(), DomainError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            token.to_string(),
            Entry {
                account_id,
                expires_at: now + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }

    async fn exists(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.owner_of(token).await.is_some())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
