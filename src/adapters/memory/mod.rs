//! In-memory adapters for tests and local development.

mod credential_store;

pub use credential_store::{
    FailurePoint, InMemoryCredentialStore, InMemoryUnitOfWork, StoredRefreshToken,
};
