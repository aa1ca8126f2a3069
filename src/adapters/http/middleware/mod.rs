//! HTTP middleware for axum.
//!
//! - `auth` - Authentication middleware and extractors

pub mod auth;

pub use auth::{access_token_from, auth_middleware, AuthState, AuthenticatedSession, RequireAuth};
