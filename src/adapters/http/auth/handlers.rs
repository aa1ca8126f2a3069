//! HTTP handlers for registration and session endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Json, State};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::adapters::http::dto::ApiResponse;
use crate::adapters::http::error::CredentialApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::account::{
    RegisterDoctorCommand, RegisterDoctorHandler, RegisterPatientCommand, RegisterPatientHandler,
};
use crate::application::handlers::session::{
    AuthenticationGate, LoginCommand, LoginHandler, LoginResult, LogoutCommand, LogoutHandler,
    RefreshAccessTokenCommand, RefreshAccessTokenHandler, RefreshAccessTokenResult,
};
use crate::domain::account::{
    DoctorRegistration, PatientRegistration, RegisteredDoctor, RegisteredPatient,
};
use crate::domain::session::{AccessClaims, LoginRequest};
use crate::ports::{CredentialStore, PasswordHasher, TokenBlacklist, TokenSigner};

use super::dto::RefreshTokenRequest;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct AuthAppState {
    pub store: Arc<dyn CredentialStore>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub signer: Arc<dyn TokenSigner>,
    pub blacklist: Arc<dyn TokenBlacklist>,
    pub blacklist_ttl_secs: u64,
}

impl AuthAppState {
    pub fn register_patient_handler(&self) -> RegisterPatientHandler {
        RegisterPatientHandler::new(self.store.clone(), self.hasher.clone())
    }

    pub fn register_doctor_handler(&self) -> RegisterDoctorHandler {
        RegisterDoctorHandler::new(self.store.clone(), self.hasher.clone())
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.store.clone(), self.hasher.clone(), self.signer.clone())
    }

    pub fn refresh_handler(&self) -> RefreshAccessTokenHandler {
        RefreshAccessTokenHandler::new(
            self.store.clone(),
            self.signer.clone(),
            self.blacklist.clone(),
            self.blacklist_ttl_secs,
        )
    }

    pub fn logout_handler(&self) -> LogoutHandler {
        LogoutHandler::new(
            self.store.clone(),
            self.blacklist.clone(),
            self.blacklist_ttl_secs,
        )
    }

    pub fn gate(&self) -> AuthenticationGate {
        AuthenticationGate::new(self.blacklist.clone(), self.signer.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Client Context
// ════════════════════════════════════════════════════════════════════════════════

/// Where a login came from, recorded with the refresh token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// First `X-Forwarded-For` hop, else the socket peer.
    fn from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = headers
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Self {
            ip_address: forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())),
            user_agent: headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

impl<S> axum::extract::FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
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
            let peer = parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr);
            Ok(ClientInfo::from_parts(&parts.headers, peer))
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Registration
// ════════════════════════════════════════════════════════════════════════════════

/// POST /register/patient - Create a patient account
pub async fn register_patient(
    State(state): State<AuthAppState>,
    payload: Result<Json<PatientRegistration>, JsonRejection>,
) -> Result<Json<ApiResponse<RegisteredPatient>>, CredentialApiError> {
    let Json(registration) = payload?;
    let registered = state
        .register_patient_handler()
        .handle(RegisterPatientCommand { registration })
        .await?;
    Ok(Json(ApiResponse::success(registered)))
}

/// POST /register/doctor - Create a doctor account
pub async fn register_doctor(
    State(state): State<AuthAppState>,
    payload: Result<Json<DoctorRegistration>, JsonRejection>,
) -> Result<Json<ApiResponse<RegisteredDoctor>>, CredentialApiError> {
    let Json(registration) = payload?;
    let registered = state
        .register_doctor_handler()
        .handle(RegisterDoctorCommand { registration })
        .await?;
    Ok(Json(ApiResponse::success(registered)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════════

/// POST /login - Exchange credentials for a token pair
pub async fn login(
    State(state): State<AuthAppState>,
    client: ClientInfo,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResult>>, CredentialApiError> {
    let Json(request) = payload?;
    let result = state
        .login_handler()
        .handle(LoginCommand {
            request,
            ip_address: client.ip_address,
            user_agent: client.user_agent,
        })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// POST /refresh - Exchange a refresh token for a new access token
pub async fn refresh(
    State(state): State<AuthAppState>,
    RequireAuth(session): RequireAuth,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RefreshAccessTokenResult>>, CredentialApiError> {
    let Json(body) = payload?;
    let result = state
        .refresh_handler()
        .handle(RefreshAccessTokenCommand {
            claims: session.claims,
            access_token: session.access_token,
            refresh_token: body.refresh_token,
        })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// POST /logout - End the session of a refresh token
pub async fn logout(
    State(state): State<AuthAppState>,
    RequireAuth(session): RequireAuth,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<&'static str>>, CredentialApiError> {
    let Json(body) = payload?;
    let message = state
        .logout_handler()
        .handle(LogoutCommand {
            claims: session.claims,
            access_token: session.access_token,
            refresh_token: body.refresh_token,
        })
        .await?;
    Ok(Json(ApiResponse::success(message)))
}

/// GET /me - Claims of the current access token
pub async fn me(RequireAuth(session): RequireAuth) -> Json<ApiResponse<AccessClaims>> {
    Json(ApiResponse::success(session.claims))
}
