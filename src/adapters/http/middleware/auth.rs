//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that runs the [`AuthenticationGate`] and injects
//!   the session into extensions
//! - `RequireAuth` - Extractor that reads the session back out
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedSession into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! Unlike an optional-auth layer, a request that fails the gate never reaches
//! the handler.
//!
//! # Example
//!
//! ```ignore
//! let gate: AuthState = Arc::new(AuthenticationGate::new(blacklist, signer));
//!
//! let app = Router::new()
//!     .route("/me", get(me))
//!     .route_layer(middleware::from_fn_with_state(gate, auth_middleware));
//!
//! async fn me(RequireAuth(session): RequireAuth) -> String {
//!     session.claims.email
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::CredentialApiError;
use crate::application::handlers::session::AuthenticationGate;
use crate::domain::foundation::AuthError;
use crate::domain::session::AccessClaims;

/// Auth middleware state - wraps the gate.
pub type AuthState = Arc<AuthenticationGate>;

/// The caller behind a request that passed the gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub claims: AccessClaims,
    /// The raw token, needed to retire it on refresh and logout.
    pub access_token: String,
}

const BEARER: &str = "Bearer";

/// Reads the access token from the `Authorization` header.
///
/// Accepts `Bearer <token>` (scheme matched case-insensitively) as well as a
/// bare token. A scheme with no token counts as no token.
pub fn access_token_from(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match (value.get(..BEARER.len()), value.get(BEARER.len()..)) {
        (Some(scheme), Some(rest))
            if scheme.eq_ignore_ascii_case(BEARER)
                && (rest.is_empty() || rest.starts_with(char::is_whitespace)) =>
        {
            rest.trim()
        }
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

/// Authentication middleware.
///
/// 1. Extracts the access token from the Authorization header
/// 2. Runs the gate: blacklist first, then signature and expiry
/// 3. On success, injects `AuthenticatedSession` into request extensions
/// 4. On failure, returns 401 (500 if the blacklist is unreachable)
pub async fn auth_middleware(
    State(gate): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = access_token_from(request.headers()).map(str::to_string);

    match gate.authenticate(token.as_deref()).await {
        Ok(verified) => {
            let session = AuthenticatedSession {
                claims: verified.claims,
                access_token: token.unwrap_or_default(),
            };
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(e) => CredentialApiError::from(e).into_response(),
    }
}

/// Extractor that requires a session injected by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedSession);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = CredentialApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedSession>()
                .cloned()
                .map(RequireAuth)
                .ok_or_else(|| CredentialApiError::from(AuthError::MissingToken))
        })
    }
}
