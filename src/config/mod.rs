//! Configuration module for the litebench application.
//!
//! Command-line values are collected into an [`AppConfig`] and validated
//! before any connection attempt:
//! - Server settings (bind address, region variable)
//! - Database settings (dsn, connector, pool size, connect retry)

mod app;
mod validation;

pub use app::{AppConfig, DatabaseConfig, DatabaseDriver};
pub use validation::{ConfigError, parse_bind_addr, parse_duration};

// Re-export constants
pub use app::{DEFAULT_ADDR, DEFAULT_REGION_ENV};
