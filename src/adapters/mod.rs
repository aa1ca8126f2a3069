//! Adapters - Implementations of the ports.
//!
//! - `postgres` - Credential store over a PostgreSQL pool
//! - `memory` - In-memory credential store for tests and development
//! - `auth` - bcrypt password hashing and JWT signing
//! - `cache` - Redis and in-memory access-token blacklists
//! - `http` - axum REST surface

pub mod auth;
pub mod cache;
pub mod http;
pub mod memory;
pub mod postgres;

pub use auth::{BcryptPasswordHasher, JwtTokenSigner};
pub use cache::{InMemoryTokenBlacklist, RedisTokenBlacklist};
pub use memory::InMemoryCredentialStore;
pub use postgres::PostgresCredentialStore;
