//! HTTP adapters - REST API implementations.
//!
//! - `auth` - Registration and session endpoints
//! - `health` - Liveness of the store and the blacklist
//! - `middleware` - Authentication gate layer and extractors

pub mod auth;
pub mod dto;
pub mod error;
pub mod health;
pub mod middleware;

use axum::Router;

pub use auth::{auth_router, AuthAppState};
pub use dto::ApiResponse;
pub use error::CredentialApiError;
pub use health::health_router;

/// Full application router: `/health` plus the auth API under `api_prefix`.
///
/// ```ignore
/// let app = app_router(state, &config.server.api_prefix());
/// ```
pub fn app_router(state: AuthAppState, api_prefix: &str) -> Router {
    Router::new()
        .merge(health_router(state.clone()))
        .nest(&format!("{}/auth", api_prefix), auth_router(state))
}
