//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence
//!
//! - `CredentialStore` - Pooled, transactional store for accounts and refresh tokens
//! - `CredentialUnitOfWork` - One connection's transaction, finished by commit or rollback
//!
//! ## Security
//!
//! - `PasswordHasher` - Salted one-way password digests
//! - `TokenSigner` - Signed, time-limited access tokens
//! - `TokenBlacklist` - TTL-bounded denylist of retired access tokens

mod credential_store;
mod password_hasher;
mod token_blacklist;
mod token_signer;

pub use credential_store::{CredentialStore, CredentialUnitOfWork};
pub use password_hasher::PasswordHasher;
pub use token_blacklist::TokenBlacklist;
pub use token_signer::{TokenSigner, VerifiedToken};
