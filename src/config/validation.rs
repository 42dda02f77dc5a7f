//! Configuration validation utilities.

use std::net::Ipv6Addr;
use std::time::Duration;

use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value was empty or absent.
    #[error("{0} required")]
    Missing(&'static str),

    /// Configuration validation failed.
    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Parse duration string using humantime.
///
/// Supports various formats: `30s`, `1m`, `5m30s`, `1h`, `100ms`, etc.
///
/// # Examples
///
/// ```
/// use litebench::config::parse_duration;
///
/// assert_eq!(parse_duration("5s").unwrap().as_secs(), 5);
/// assert_eq!(parse_duration("1m").unwrap().as_secs(), 60);
/// assert_eq!(parse_duration("250ms").unwrap().as_millis(), 250);
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("duration string is empty".to_string());
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Normalize a bind address into `host:port`.
///
/// A bare `:port` listens on all interfaces. The host may be an IP literal or
/// a name; names are resolved when the listener binds.
///
/// # Examples
///
/// ```
/// use litebench::config::parse_bind_addr;
///
/// assert_eq!(parse_bind_addr(":8080").unwrap(), "0.0.0.0:8080");
/// assert_eq!(parse_bind_addr("localhost:3000").unwrap(), "localhost:3000");
/// ```
pub fn parse_bind_addr(addr: &str) -> Result<String, ConfigError> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(ConfigError::Missing("bind address"));
    }

    let invalid = || ConfigError::ValidationError(format!("invalid bind address: '{addr}'"));

    let (host, port) = addr.rsplit_once(':').ok_or_else(invalid)?;
    port.parse::<u16>().map_err(|_| invalid())?;

    let host = match host {
        "" => "0.0.0.0",
        host if host.starts_with('[') => {
            host.strip_prefix('[')
                .and_then(|h| h.strip_suffix(']'))
                .and_then(|h| h.parse::<Ipv6Addr>().ok())
                .ok_or_else(invalid)?;
            host
        }
        host if host.contains(':') || host.chars().any(char::is_whitespace) => {
            return Err(invalid());
        }
        host => host,
    };

    Ok(format!("{host}:{port}"))
}
