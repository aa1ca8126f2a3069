//! Session handlers.
//!
//! ## Commands
//! - Logging in with email, password and role
//! - Refreshing an access token with a refresh token
//! - Logging out one session
//!
//! ## Gate
//! - Authenticating the bearer token of a protected request

mod gate;
mod login;
mod logout;
mod refresh;

pub use gate::AuthenticationGate;
pub use login::{LoginCommand, LoginHandler, LoginResult};
pub use logout::{LogoutCommand, LogoutHandler, ALREADY_INVALIDATED, LOGOUT_SUCCESSFUL};
pub use refresh::{
    RefreshAccessTokenCommand, RefreshAccessTokenHandler, RefreshAccessTokenResult,
    UNKNOWN_REFRESH_TOKEN,
};

use crate::domain::foundation::CredentialError;
use crate::domain::session::RefreshToken;

pub const REFRESH_TOKEN_REQUIRED: &str = "Refresh token must be provided";
pub const FAILED_TO_BLACKLIST: &str = "Failed to blacklist access token";

fn presented_refresh_token(value: Option<String>) -> Result<RefreshToken, CredentialError> {
    match value {
        Some(token) if !token.is_empty() => Ok(RefreshToken::from_presented(token)),
        _ => Err(CredentialError::invalid_data(REFRESH_TOKEN_REQUIRED)),
    }
}
