//! Authentication types shared by the token signer, the blacklist and the
//! authentication gate.
//!
//! # Design Decisions
//!
//! - `AuthError` keeps `TokenExpired` apart from `InvalidToken` so callers can
//!   send the user back to login or simply retry with a refreshed token
//! - Every rejection other than expiry renders the same public message, so a
//!   caller cannot tell a revoked token from a forged one

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account kinds that can hold a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    /// Returns the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string was not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role must be either 'patient' or 'doctor'")]
pub struct UnknownRole;

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            _ => Err(UnknownRole),
        }
    }
}

/// Authentication errors raised while admitting a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No token was presented.
    #[error("You are not authenticated")]
    MissingToken,

    /// The token was retired by logout or refresh.
    #[error("You are not authenticated")]
    RevokedToken,

    /// The token is malformed, has a bad signature, or carries unusable claims.
    #[error("You are not authenticated")]
    InvalidToken,

    /// The token signature is valid but its `exp` claim has lapsed.
    #[error("Token has expired")]
    TokenExpired,

    /// The blacklist could not be consulted.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the caller has to log in again to obtain a new session.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken | AuthError::RevokedToken | AuthError::InvalidToken
        )
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_known_values() {
        assert_eq!("patient".parse::<Role>(), Ok(Role::Patient));
        assert_eq!("doctor".parse::<Role>(), Ok(Role::Doctor));
    }

    #[test]
    fn role_rejects_unknown_and_differently_cased_values() {
        assert_eq!("admin".parse::<Role>(), Err(UnknownRole));
        assert_eq!("Doctor".parse::<Role>(), Err(UnknownRole));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), "\"doctor\"");
    }

    #[test]
    fn rejections_share_a_public_message_except_expiry() {
        assert_eq!(AuthError::MissingToken.to_string(), "You are not authenticated");
        assert_eq!(AuthError::RevokedToken.to_string(), "You are not authenticated");
        assert_eq!(AuthError::InvalidToken.to_string(), "You are not authenticated");
        assert_eq!(AuthError::TokenExpired.to_string(), "Token has expired");
    }

    #[test]
    fn expired_token_does_not_force_reauthentication() {
        assert!(!AuthError::TokenExpired.requires_reauthentication());
        assert!(AuthError::RevokedToken.requires_reauthentication());
    }

    #[test]
    fn service_errors_are_transient() {
        assert!(AuthError::service_unavailable("timeout").is_transient());
        assert!(!AuthError::InvalidToken.is_transient());
    }
}
