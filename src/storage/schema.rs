//! Database schema definitions and migration.
//!
//! One idempotent script per backend, embedded at compile time and run once
//! at startup through the regular `execute` path.

use crate::config::DatabaseDriver;
use crate::storage::StorageError;
use crate::storage::db::Database;

/// Schema for the embedded SQLite backend.
pub const SQLITE_SCHEMA: &str = include_str!("../../migrations/schema.sqlite.sql");

/// Schema for the PostgreSQL backend.
pub const POSTGRES_SCHEMA: &str = include_str!("../../migrations/schema.postgres.sql");

/// Schema script for the given driver.
pub fn schema_for(driver: DatabaseDriver) -> &'static str {
    match driver {
        DatabaseDriver::Sqlite => SQLITE_SCHEMA,
        DatabaseDriver::Postgres => POSTGRES_SCHEMA,
    }
}

/// Run the schema migration for the connected database.
///
/// Safe to run against an already-migrated database.
pub async fn migrate(db: &Database) -> Result<(), StorageError> {
    db.execute(schema_for(db.driver()), &[])
        .await
        .map_err(|e| StorageError::Migration(Box::new(e)))?;

    tracing::info!(driver = %db.driver(), "Database schema migrated");
    Ok(())
}
