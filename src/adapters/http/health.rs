//! Health check handler.
//!
//! Round-trips the credential store and the blacklist. Either failure turns
//! into the opaque 500 envelope.

use axum::{extract::State, routing::get, Json, Router};

use crate::adapters::http::auth::AuthAppState;
use crate::domain::foundation::CredentialError;

use super::dto::ApiResponse;
use super::error::CredentialApiError;

/// GET /health
pub async fn health_check(
    State(state): State<AuthAppState>,
) -> Result<Json<ApiResponse<String>>, CredentialApiError> {
    state.store.ping().await.map_err(CredentialError::from)?;
    state.blacklist.ping().await.map_err(CredentialError::from)?;

    Ok(Json(ApiResponse::success(format!(
        "Mediverse Backend Service is running with version {}",
        env!("CARGO_PKG_VERSION")
    ))))
}

pub fn health_router(state: AuthAppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}
