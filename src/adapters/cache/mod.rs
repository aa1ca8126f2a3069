//! Token blacklist adapters.
//!
//! - `RedisTokenBlacklist` - Shared, TTL-bounded blacklist for production
//! - `InMemoryTokenBlacklist` - Process-local blacklist for tests and development

mod in_memory_blacklist;
mod redis_blacklist;

pub use in_memory_blacklist::InMemoryTokenBlacklist;
pub use redis_blacklist::RedisTokenBlacklist;
