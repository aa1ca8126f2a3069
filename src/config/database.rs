//! Credential store connection settings.
//!
//! The pool is the only shared resource for durable state. It is bounded on
//! both ends: `max_connections` caps concurrent units of work, and a caller
//! that finds the pool exhausted waits at most `acquire_timeout_secs` before
//! the unit fails to begin with a database error. Neither bound may be
//! disabled, so exhaustion always ends in either a connection or an error.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Largest pool `validate` accepts.
pub const MAX_POOL_SIZE: u32 = 100;

/// PostgreSQL pool settings for the credential store.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` or `postgresql://` URL
    pub url: String,

    /// Connections kept open while idle
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Upper bound on concurrent units of work
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long `begin` waits for a free connection
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,

    /// Apply `migrations/` at startup
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    /// Checks the URL scheme and the pool bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("MEDIVERSE__DATABASE__URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        if self.acquire_timeout_secs == 0 {
            return Err(ValidationError::InvalidAcquireTimeout);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            run_migrations: false,
        }
    }
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_max_lifetime() -> u64 {
    1800
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(min: u32, max: u32) -> DatabaseConfig {
        DatabaseConfig {
            url: "postgresql://mediverse@localhost:5432/mediverse".to_string(),
            min_connections: min,
            max_connections: max,
            ..Default::default()
        }
    }

    #[test]
    fn defaults_describe_a_small_bounded_pool() {
        let config = DatabaseConfig::default();
        assert_eq!((config.min_connections, config.max_connections), (1, 10));
        assert_eq!(config.acquire_timeout(), Duration::from_secs(30));
        assert!(!config.run_migrations);
    }

    #[test]
    fn url_is_required_and_must_be_postgres() {
        assert_eq!(
            DatabaseConfig::default().validate(),
            Err(ValidationError::MissingRequired("MEDIVERSE__DATABASE__URL"))
        );

        let config = DatabaseConfig {
            url: "mysql://localhost/mediverse".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidDatabaseUrl));

        let config = DatabaseConfig {
            url: "postgres://localhost/mediverse".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn pool_bounds_must_be_ordered_and_nonzero() {
        assert_eq!(pool(10, 5).validate(), Err(ValidationError::InvalidPoolSize));
        assert_eq!(pool(0, 0).validate(), Err(ValidationError::InvalidPoolSize));
        assert_eq!(
            pool(1, MAX_POOL_SIZE + 1).validate(),
            Err(ValidationError::PoolSizeTooLarge)
        );
        assert!(pool(0, 1).validate().is_ok());
        assert!(pool(5, MAX_POOL_SIZE).validate().is_ok());
    }

    #[test]
    fn acquisition_wait_cannot_be_disabled() {
        let config = DatabaseConfig {
            acquire_timeout_secs: 0,
            ..pool(1, 10)
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidAcquireTimeout));
    }
}
