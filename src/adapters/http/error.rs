//! Mapping of credential errors onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::domain::foundation::{AuthError, CredentialError};

use super::dto::ApiResponse;

pub const INVALID_REQUEST_BODY: &str = "Invalid request body";

/// Credential error as an HTTP response.
///
/// | Error | Status |
/// |-------|--------|
/// | InvalidData | 400 |
/// | Unauthorized | 401 |
/// | Server | 500, opaque message |
#[derive(Debug)]
pub struct CredentialApiError(pub CredentialError);

impl CredentialApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CredentialError::InvalidData(_) => StatusCode::BAD_REQUEST,
            CredentialError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CredentialError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CredentialError> for CredentialApiError {
    fn from(err: CredentialError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for CredentialApiError {
    fn from(err: AuthError) -> Self {
        Self(CredentialError::from(err))
    }
}

impl From<JsonRejection> for CredentialApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        Self(CredentialError::invalid_data(INVALID_REQUEST_BODY))
    }
}

impl IntoResponse for CredentialApiError {
    fn into_response(self) -> Response {
        if let CredentialError::Server(detail) = &self.0 {
            tracing::error!(detail = %detail, "Request failed with server error");
        }

        let status = self.status();
        (status, Json(ApiResponse::error(self.0.message()))).into_response()
    }
}
