//! Database abstraction over the supported backends.
//!
//! [`Database`] is a tagged union of [`SqliteDatabase`] (embedded file) and
//! [`PostgresDatabase`] (client-server). Both expose the same operations:
//! `connect`, `close`, `query`, `execute` and `execute_cancellable`.
//!
//! Statements are written once with `$N` placeholders; the SQLite variant
//! rewrites them to `?` (see [`placeholder`]). The abstraction logs nothing
//! and returns every failure to the caller.
//!
//! # Example
//!
//! ```ignore
//! let mut db = Database::new(DatabaseDriver::Sqlite, DatabaseOptions::default());
//! db.connect("data/persons.db").await?;
//! db.execute("INSERT INTO persons (name, phone, company) VALUES ($1, $2, $3)", &args).await?;
//! ```

pub mod placeholder;
mod postgres;
pub mod retry;
mod sqlite;

use std::time::Duration;

use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use tokio_util::sync::CancellationToken;

pub use postgres::PostgresDatabase;
pub use retry::RetryPolicy;
pub use sqlite::SqliteDatabase;

use crate::config::DatabaseDriver;
use crate::storage::{ExecResult, SqlValue, StorageError};

/// Default maximum connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default timeout for acquiring a pooled connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool and connect settings shared by both backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Connect retry policy; only the PostgreSQL backend uses it.
    pub retry: RetryPolicy,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// A database handle for one of the supported backends.
#[derive(Debug)]
pub enum Database {
    Sqlite(SqliteDatabase),
    Postgres(PostgresDatabase),
}

impl Database {
    /// Create an unconnected handle for the given driver.
    pub fn new(driver: DatabaseDriver, options: DatabaseOptions) -> Self {
        match driver {
            DatabaseDriver::Sqlite => Self::Sqlite(SqliteDatabase::new(options)),
            DatabaseDriver::Postgres => Self::Postgres(PostgresDatabase::new(options)),
        }
    }

    pub fn driver(&self) -> DatabaseDriver {
        match self {
            Self::Sqlite(_) => DatabaseDriver::Sqlite,
            Self::Postgres(_) => DatabaseDriver::Postgres,
        }
    }

    /// Establish the connection pool.
    ///
    /// SQLite attempts once; PostgreSQL retries per [`DatabaseOptions::retry`].
    pub async fn connect(&mut self, dsn: &str) -> Result<(), StorageError> {
        match self {
            Self::Sqlite(db) => db.connect(dsn).await,
            Self::Postgres(db) => db.connect(dsn).await,
        }
    }

    /// Release the connection pool. Safe on an unconnected handle.
    pub async fn close(&self) {
        match self {
            Self::Sqlite(db) => db.close().await,
            Self::Postgres(db) => db.close().await,
        }
    }

    /// Run a read statement and decode every returned row.
    pub async fn query<T>(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<T>, StorageError>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow>
            + for<'r> sqlx::FromRow<'r, PgRow>
            + Send
            + Unpin,
    {
        match self {
            Self::Sqlite(db) => db.query(sql, args).await,
            Self::Postgres(db) => db.query(sql, args).await,
        }
    }

    /// Run a write statement.
    pub async fn execute(&self, sql: &str, args: &[SqlValue]) -> Result<ExecResult, StorageError> {
        match self {
            Self::Sqlite(db) => db.execute(sql, args).await,
            Self::Postgres(db) => db.execute(sql, args).await,
        }
    }

    /// Run a write statement, abandoning it when `cancel` fires first.
    ///
    /// An already-cancelled token never reaches the database.
    pub async fn execute_cancellable(
        &self,
        cancel: &CancellationToken,
        sql: &str,
        args: &[SqlValue],
    ) -> Result<ExecResult, StorageError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StorageError::Cancelled),
            result = self.execute(sql, args) => result,
        }
    }
}
