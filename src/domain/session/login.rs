//! Login payload shape checks.
//!
//! These run before any store access. Failing credentials later on always
//! report [`INVALID_CREDENTIALS`] so the caller cannot probe for accounts.

use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::account::registration::is_strong_password;
use crate::domain::foundation::{Role, ValidationError};

pub const MISSING_LOGIN_FIELDS: &str = "Email, password, and role must be provided";
pub const INVALID_EMAIL: &str = "Invalid email format";
pub const INVALID_PASSWORD_SHAPE: &str = "Password must be at least 6 characters long";
pub const INVALID_ROLE: &str = "Role must be either 'patient' or 'doctor'";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

static LOGIN_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

/// Raw login payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub role: Option<String>,
}

/// Login payload that passed the shape checks.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
    pub role: Role,
}

impl LoginRequest {
    /// Checks presence, email shape, password shape and role, in that order.
    pub fn validate(&self) -> Result<LoginCredentials, ValidationError> {
        let email = self.email.as_deref().filter(|v| !v.is_empty());
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_str())
            .filter(|v| !v.is_empty());
        let role = self.role.as_deref().filter(|v| !v.is_empty());

        let (email, password, role) = match (email, password, role) {
            (Some(e), Some(p), Some(r)) => (e, p, r),
            _ => return Err(ValidationError::missing_required(MISSING_LOGIN_FIELDS)),
        };

        if !LOGIN_EMAIL.is_match(email) {
            return Err(ValidationError::invalid_format("email", INVALID_EMAIL));
        }
        if !is_strong_password(password) {
            return Err(ValidationError::invalid_format("password", INVALID_PASSWORD_SHAPE));
        }
        let role: Role = role
            .parse()
            .map_err(|_| ValidationError::invalid_format("role", INVALID_ROLE))?;

        Ok(LoginCredentials {
            email: email.to_string(),
            password: SecretString::new(password.to_string()),
            role,
        })
    }
}

/// Message for an account that exists but lacks the requested role.
pub fn missing_role_profile_message(role: Role) -> String {
    format!("No {} account associated with this email", role)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str, role: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(SecretString::new(password.to_string())),
            role: Some(role.to_string()),
        }
    }

    fn reason(req: LoginRequest) -> String {
        req.validate().unwrap_err().to_string()
    }

    #[test]
    fn valid_request_parses_role() {
        let creds = request("a@b.com", "Abcdef1", "patient").validate().unwrap();
        assert_eq!(creds.email, "a@b.com");
        assert_eq!(creds.role, Role::Patient);
        assert_eq!(creds.password.expose_secret(), "Abcdef1");
    }

    #[test]
    fn missing_field_is_reported_first() {
        let mut req = request("bad", "x", "admin");
        req.role = None;
        assert_eq!(reason(req), MISSING_LOGIN_FIELDS);
    }

    #[test]
    fn email_needs_a_top_level_domain() {
        assert_eq!(reason(request("a@b", "Abcdef1", "patient")), INVALID_EMAIL);
    }

    #[test]
    fn weak_password_is_rejected_before_role() {
        assert_eq!(reason(request("a@b.com", "abcdef", "admin")), INVALID_PASSWORD_SHAPE);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_eq!(reason(request("a@b.com", "Abcdef1", "admin")), INVALID_ROLE);
    }

    #[test]
    fn missing_profile_message_names_role() {
        assert_eq!(
            missing_role_profile_message(Role::Doctor),
            "No doctor account associated with this email"
        );
    }
}
