//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum signing key length accepted in production.
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Authentication configuration (JWT signing, blacklist, password hashing)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Symmetric JWT signing secret
    pub jwt_secret: SecretString,

    /// JWT signing algorithm
    #[serde(default)]
    pub jwt_algorithm: JwtAlgorithm,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_secs: u64,

    /// How long a retired access token stays blacklisted, in seconds
    #[serde(default = "default_blacklist_ttl")]
    pub blacklist_ttl_secs: u64,

    /// bcrypt work factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

/// HMAC algorithms accepted for access tokens
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum JwtAlgorithm {
    #[default]
    Hs256,
    Hs384,
    Hs512,
}

impl AuthConfig {
    /// Builds a config with defaults around the given secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: SecretString::new(secret.into()),
            jwt_algorithm: JwtAlgorithm::default(),
            access_token_ttl_secs: default_access_token_ttl(),
            blacklist_ttl_secs: default_blacklist_ttl(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }

    /// Validate authentication configuration
    ///
    /// In production, requires a signing secret of at least 32 bytes.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret_len = self.jwt_secret.expose_secret().len();
        if secret_len == 0 {
            return Err(ValidationError::MissingRequired("MEDIVERSE__AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production && secret_len < MIN_PRODUCTION_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.access_token_ttl_secs == 0 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        // A retired token must not outlive its blacklist entry.
        if self.blacklist_ttl_secs < self.access_token_ttl_secs {
            return Err(ValidationError::BlacklistTtlTooShort);
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ValidationError::InvalidBcryptCost);
        }
        Ok(())
    }
}

fn default_access_token_ttl() -> u64 {
    3600
}

fn default_blacklist_ttl() -> u64 {
    3600
}

fn default_bcrypt_cost() -> u32 {
    12
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::with_secret("dev-secret");
        assert_eq!(config.jwt_algorithm, JwtAlgorithm::Hs256);
        assert_eq!(config.access_token_ttl_secs, 3600);
        assert_eq!(config.blacklist_ttl_secs, 3600);
        assert_eq!(config.bcrypt_cost, 12);
    }

    #[test]
    fn test_validation_missing_secret() {
        let config = AuthConfig::with_secret("");
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("MEDIVERSE__AUTH__JWT_SECRET"))
        );
    }

    #[test]
    fn test_short_secret_allowed_in_development_only() {
        let config = AuthConfig::with_secret("dev-secret");
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort)
        );

        let config = AuthConfig::with_secret(LONG_SECRET);
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_blacklist_ttl_must_cover_token_lifetime() {
        let config = AuthConfig {
            blacklist_ttl_secs: 60,
            ..AuthConfig::with_secret(LONG_SECRET)
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::BlacklistTtlTooShort)
        );
    }

    #[test]
    fn test_zero_token_lifetime_rejected() {
        let config = AuthConfig {
            access_token_ttl_secs: 0,
            ..AuthConfig::with_secret(LONG_SECRET)
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidTokenTtl)
        );
    }

    #[test]
    fn test_bcrypt_cost_range() {
        for cost in [3, 32] {
            let config = AuthConfig {
                bcrypt_cost: cost,
                ..AuthConfig::with_secret(LONG_SECRET)
            };
            assert_eq!(
                config.validate(&Environment::Development),
                Err(ValidationError::InvalidBcryptCost)
            );
        }
    }

    #[test]
    fn test_debug_does_not_print_secret() {
        let config = AuthConfig::with_secret(LONG_SECRET);
        assert!(!format!("{:?}", config).contains(LONG_SECRET));
    }
}
