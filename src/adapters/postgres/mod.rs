//! PostgreSQL adapters - Database implementations for persistence ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresCredentialStore` - Accounts, role profiles and the refresh-token ledger
//! - `connect_pool` / `run_migrations` - Pool construction and schema setup

mod credential_store;
mod pool;

pub use credential_store::{PostgresCredentialStore, PostgresUnitOfWork};
pub use pool::{connect_pool, run_migrations};
