//! Credential lifecycle error taxonomy.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidData | 400 |
//! | Unauthorized | 401 |
//! | Server | 500 |

use super::{AuthError, DomainError, ErrorCode, ValidationError};

/// Public message returned for every server-side failure.
pub const SERVER_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors raised by registration and the session controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Malformed input, duplicate email/license, or bad credentials.
    ///
    /// The message is safe to return to the caller verbatim.
    InvalidData(String),

    /// The bearer token was missing, revoked, expired or invalid.
    Unauthorized(AuthError),

    /// Store, hashing, signing or cache failure. The detail is for logs only.
    Server(String),
}

impl CredentialError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        CredentialError::InvalidData(message.into())
    }

    pub fn unauthorized(err: AuthError) -> Self {
        CredentialError::Unauthorized(err)
    }

    pub fn server(detail: impl Into<String>) -> Self {
        CredentialError::Server(detail.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CredentialError::InvalidData(_) => ErrorCode::ValidationFailed,
            CredentialError::Unauthorized(AuthError::TokenExpired) => ErrorCode::TokenExpired,
            CredentialError::Unauthorized(_) => ErrorCode::Unauthorized,
            CredentialError::Server(_) => ErrorCode::InternalError,
        }
    }

    /// Returns the message that may be shown to the caller.
    pub fn message(&self) -> String {
        match self {
            CredentialError::InvalidData(msg) => msg.clone(),
            CredentialError::Unauthorized(err) => err.to_string(),
            CredentialError::Server(_) => SERVER_ERROR_MESSAGE.to_string(),
        }
    }

    /// Returns true for failures caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CredentialError::InvalidData(_) | CredentialError::Unauthorized(_)
        )
    }
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialError::Server(detail) => write!(f, "server error: {}", detail),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for CredentialError {}

impl From<ValidationError> for CredentialError {
    fn from(err: ValidationError) -> Self {
        CredentialError::InvalidData(err.to_string())
    }
}

impl From<DomainError> for CredentialError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed | ErrorCode::EmailExists | ErrorCode::LicenseExists => {
                CredentialError::InvalidData(err.message)
            }
            ErrorCode::Unauthorized => CredentialError::Unauthorized(AuthError::InvalidToken),
            ErrorCode::TokenExpired => CredentialError::Unauthorized(AuthError::TokenExpired),
            ErrorCode::DatabaseError | ErrorCode::CacheError | ErrorCode::InternalError => {
                CredentialError::Server(err.to_string())
            }
        }
    }
}

impl From<AuthError> for CredentialError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ServiceUnavailable(detail) => CredentialError::Server(detail),
            other => CredentialError::Unauthorized(other),
        }
    }
}
