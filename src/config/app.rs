//! Application configuration structures.

use std::time::Duration;

use strum_macros::{AsRefStr, Display, EnumString};

use super::validation::{ConfigError, parse_bind_addr};
use crate::storage::db::retry::{DEFAULT_BASE_DELAY, DEFAULT_CONNECT_ATTEMPTS};
use crate::storage::db::{
    DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DatabaseOptions, RetryPolicy,
};

// =============================================================================
// Constants
// =============================================================================

/// Default bind address; a bare port listens on all interfaces.
pub const DEFAULT_ADDR: &str = ":8080";

/// Default environment variable holding the current deployment region.
pub const DEFAULT_REGION_ENV: &str = "FLY_REGION";

// =============================================================================
// Database Configuration
// =============================================================================

/// Supported database connectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DatabaseDriver {
    /// Embedded SQLite file.
    #[default]
    Sqlite,
    /// PostgreSQL server.
    Postgres,
}

impl DatabaseDriver {
    /// Parse a connector name as given on the command line.
    pub fn parse_connector(name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::Missing("database connector"));
        }
        name.parse().map_err(|_| {
            ConfigError::ValidationError(format!("unknown database connector: '{name}'"))
        })
    }
}

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string: a file path for SQLite, a URL for PostgreSQL.
    pub dsn: String,

    /// Connector (default: sqlite).
    pub driver: DatabaseDriver,

    /// Maximum pooled connections (default: 5).
    pub max_connections: u32,

    /// Connect attempts for PostgreSQL (default: 3).
    pub connect_attempts: u32,

    /// Wait after the first failed connect; doubles per attempt (default: 5s).
    pub connect_backoff: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            driver: DatabaseDriver::default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            connect_backoff: DEFAULT_BASE_DELAY,
        }
    }
}

impl DatabaseConfig {
    /// Pool and retry settings for the storage layer.
    pub fn options(&self) -> DatabaseOptions {
        DatabaseOptions {
            max_connections: self.max_connections,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            retry: RetryPolicy::new(self.connect_attempts, self.connect_backoff),
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP bind address (default: ":8080").
    pub addr: String,

    /// Database configuration.
    pub database: DatabaseConfig,

    /// Environment variable read per request for the current region.
    pub region_env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            database: DatabaseConfig::default(),
            region_env: DEFAULT_REGION_ENV.to_string(),
        }
    }
}

impl AppConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` for empty required values and
    /// `ConfigError::ValidationError` for out-of-range ones.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.dsn.trim().is_empty() {
            return Err(ConfigError::Missing("dsn"));
        }

        self.bind_addr()?;

        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "max_connections must be positive".to_string(),
            ));
        }

        if self.database.connect_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "connect_retries must be positive".to_string(),
            ));
        }

        if self.region_env.trim().is_empty() {
            return Err(ConfigError::Missing("region environment variable name"));
        }

        Ok(())
    }

    /// Normalized `host:port` to bind.
    pub fn bind_addr(&self) -> Result<String, ConfigError> {
        parse_bind_addr(&self.addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn valid_config() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                dsn: "/tmp/litebench.db".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.addr, ":8080");
        assert_eq!(config.region_env, "FLY_REGION");
        assert_eq!(config.database.driver, DatabaseDriver::Sqlite);
        assert_eq!(config.database.connect_attempts, 3);
        assert_eq!(config.database.connect_backoff, Duration::from_secs(5));
    }

    #[test]
    fn test_driver_from_str() {
        assert_eq!(
            DatabaseDriver::from_str("sqlite").unwrap(),
            DatabaseDriver::Sqlite
        );
        assert_eq!(
            DatabaseDriver::from_str("Postgres").unwrap(),
            DatabaseDriver::Postgres
        );
        assert!(DatabaseDriver::from_str("mysql").is_err());
        assert_eq!(DatabaseDriver::Postgres.to_string(), "postgres");
    }

    #[test]
    fn test_parse_connector_errors() {
        assert!(matches!(
            DatabaseDriver::parse_connector(""),
            Err(ConfigError::Missing("database connector"))
        ));
        let err = DatabaseDriver::parse_connector("mysql").unwrap_err();
        assert!(err.to_string().contains("unknown database connector"));
    }

    #[test]
    fn test_config_validation_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_dsn() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "dsn required");
    }

    #[test]
    fn test_config_validation_empty_addr() {
        let config = AppConfig {
            addr: String::new(),
            ..valid_config()
        };
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "bind address required"
        );
    }

    #[test]
    fn test_config_bind_addr_hostname() {
        let config = AppConfig {
            addr: "localhost:8080".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr().unwrap(), "localhost:8080");
    }

    #[test]
    fn test_config_validation_zero_connections() {
        let mut config = valid_config();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_options_carry_retry_policy() {
        let mut config = valid_config();
        config.database.connect_attempts = 4;
        config.database.connect_backoff = Duration::from_millis(250);

        let options = config.database.options();
        assert_eq!(options.retry.attempts, 4);
        assert_eq!(options.retry.base_delay, Duration::from_millis(250));
    }
}
