//! Request DTOs for session endpoints.
//!
//! Registration and login bodies deserialize straight into the domain
//! payloads, which report absent fields through their own rules.

use serde::Deserialize;

/// Body of `/refresh` and `/logout`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_token_is_optional_in_the_body() {
        let body: RefreshTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(body.refresh_token.is_none());

        let body: RefreshTokenRequest =
            serde_json::from_str(r#"{"refresh_token": "abc"}"#).unwrap();
        assert_eq!(body.refresh_token.as_deref(), Some("abc"));
    }
}
