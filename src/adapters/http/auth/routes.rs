//! Axum router configuration for auth endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::adapters::http::middleware::{auth_middleware, AuthState};

use super::handlers::{
    login, logout, me, refresh, register_doctor, register_patient, AuthAppState,
};

/// Create the auth API router.
///
/// # Routes
///
/// ## Public
/// - `POST /register/patient` - Create a patient account
/// - `POST /register/doctor` - Create a doctor account
/// - `POST /login` - Exchange credentials for a token pair
///
/// ## Behind the authentication gate
/// - `POST /refresh` - New access token for a refresh token
/// - `POST /logout` - End a session
/// - `GET /me` - Claims of the current access token
pub fn auth_router(state: AuthAppState) -> Router {
    let gate: AuthState = Arc::new(state.gate());

    let protected = Router::new()
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(gate, auth_middleware));

    Router::new()
        .route("/register/patient", post(register_patient))
        .route("/register/doctor", post(register_doctor))
        .route("/login", post(login))
        .merge(protected)
        .with_state(state)
}
