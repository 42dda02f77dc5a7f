//! Storage builder and handles.
//!
//! Provides a builder pattern for constructing the storage layer
//! and a handles struct for accessing all storage facades.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DatabaseDriver;
use crate::storage::db::{Database, DatabaseOptions, RetryPolicy};
use crate::storage::schema::migrate;
use crate::storage::{PersonStore, StorageError};

/// Builder for constructing the storage layer.
pub struct StorageBuilder {
    driver: DatabaseDriver,
    dsn: String,
    options: DatabaseOptions,
}

impl StorageBuilder {
    /// Create a new storage builder.
    pub fn new(driver: DatabaseDriver, dsn: impl Into<String>) -> Self {
        Self {
            driver,
            dsn: dsn.into(),
            options: DatabaseOptions::default(),
        }
    }

    /// Set the maximum number of pooled connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.options.max_connections = max;
        self
    }

    /// Set the timeout for acquiring a pooled connection.
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.options.acquire_timeout = timeout;
        self
    }

    /// Set the connect retry policy.
    ///
    /// Only the PostgreSQL backend retries; SQLite always tries once.
    pub fn connect_retry(mut self, retry: RetryPolicy) -> Self {
        self.options.retry = retry;
        self
    }

    /// Connect, run the schema migration and return handles.
    ///
    /// A migration failure closes the fresh connection before returning.
    pub async fn build(self) -> Result<StorageHandles, StorageError> {
        if self.driver == DatabaseDriver::Sqlite {
            create_parent_dir(&self.dsn)?;
        }

        let mut db = Database::new(self.driver, self.options);
        db.connect(&self.dsn).await?;

        if let Err(e) = migrate(&db).await {
            db.close().await;
            return Err(e);
        }

        let db = Arc::new(db);
        Ok(StorageHandles {
            persons: PersonStore::new(Arc::clone(&db)),
            database: db,
        })
    }
}

/// Create the parent directory of a SQLite file path if it doesn't exist.
fn create_parent_dir(dsn: &str) -> Result<(), StorageError> {
    let path = dsn.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
    if path.starts_with(':') || path.starts_with("file:") {
        return Ok(());
    }
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            StorageError::Internal(format!(
                "Failed to create database directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Handles to the storage layer.
#[derive(Clone)]
pub struct StorageHandles {
    /// Person storage facade.
    pub persons: PersonStore,
    /// Shared database handle.
    pub database: Arc<Database>,
}

impl StorageHandles {
    /// Close the database connection.
    pub async fn shutdown(self) {
        self.database.close().await;
    }
}
