//! Redis-backed access-token blacklist for production deployments.
//!
//! Each retired token is one key written with `SET key account_id EX ttl`,
//! so the write and its expiry are atomic and shared by every server.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;

use crate::config::RedisConfig;
use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
use crate::ports::TokenBlacklist;

/// Redis-backed token blacklist.
#[derive(Clone)]
pub struct RedisTokenBlacklist {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisTokenBlacklist {
    /// Create a new blacklist over an existing connection.
    pub fn new(conn: MultiplexedConnection, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a multiplexed connection, giving up after `timeout_secs`.
    pub async fn connect(config: &RedisConfig) -> Result<Self, DomainError> {
        let client = redis::Client::open(config.url.as_str()).map_err(cache_error)?;
        let conn = tokio::time::timeout(config.timeout(), client.get_multiplexed_tokio_connection())
            .await
            .map_err(|_| DomainError::new(ErrorCode::CacheError, "Timed out connecting to Redis"))?
            .map_err(cache_error)?;

        Ok(Self::new(conn, config.key_prefix.clone()))
    }

    fn key(&self, token: &str) -> String {
        format!("{}{}", self.key_prefix, token)
    }
}

#[async_trait]
impl TokenBlacklist for RedisTokenBlacklist {
    async fn put(&self, token: &str, account_id: AccountId, ttl_secs: u64) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();

        // Redis rejects EX 0.
        redis::cmd("SET")
            .arg(self.key(token))
            .arg(account_id.to_string())
            .arg("EX")
            .arg(ttl_secs.max(1))
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(cache_error)
    }

    async fn exists(&self, token: &str) -> Result<bool, DomainError> {
        let mut conn = self.conn.clone();

        redis::cmd("EXISTS")
            .arg(self.key(token))
            .query_async::<_, bool>(&mut conn)
            .await
            .map_err(cache_error)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(cache_error)
    }
}

fn cache_error(e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("Redis error: {}", e))
}
