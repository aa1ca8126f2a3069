//! Session domain module.
//!
//! Access-token claims, refresh tokens and login credentials.
//!
//! # Lifecycle
//!
//! `Anonymous -> Authenticated(access, refresh) -> Refreshed(access', refresh) | LoggedOut`
//!
//! A logged-out caller only becomes authenticated again through a fresh login.

mod claims;
pub mod login;
mod refresh_token;

pub use claims::{AccessClaims, AccountSummary, RoleClaims};
pub use login::{LoginCredentials, LoginRequest};
pub use refresh_token::{NewRefreshTokenRecord, RefreshToken, REFRESH_TOKEN_LEN};
