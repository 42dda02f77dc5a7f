//! SQLite backend implementation using sqlx.
//!
//! Statements arrive with `$N` placeholders and are normalized to `?`
//! before they reach the driver.

use sqlx::Arguments;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
    SqliteRow, SqliteSynchronous,
};
use std::str::FromStr;

use super::DatabaseOptions;
use super::placeholder::postgres_to_sqlite;
use crate::storage::{ExecResult, SqlValue, StorageError};

/// SQLite database handle.
///
/// Holds no pool until [`SqliteDatabase::connect`] succeeds.
#[derive(Default)]
pub struct SqliteDatabase {
    options: DatabaseOptions,
    pool: Option<SqlitePool>,
}

impl std::fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDatabase")
            .field("connected", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

impl SqliteDatabase {
    pub fn new(options: DatabaseOptions) -> Self {
        Self {
            options,
            pool: None,
        }
    }

    /// Open the database file, creating it if missing.
    ///
    /// Accepts a bare path or a `sqlite:` URL. A single attempt is made.
    ///
    /// # Configuration
    ///
    /// - WAL journal mode for concurrent readers
    /// - Normal synchronous mode for performance with durability
    pub async fn connect(&mut self, dsn: &str) -> Result<(), StorageError> {
        let options = SqliteConnectOptions::from_str(dsn)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(self.options.max_connections)
            .acquire_timeout(self.options.acquire_timeout)
            .connect_with(options)
            .await?;

        self.pool = Some(pool);
        Ok(())
    }

    /// Close the pool gracefully. No-op when never connected.
    ///
    /// Later operations fail with [`StorageError::NotConnected`].
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }

    pub async fn query<T>(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<T>, StorageError>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let pool = self.pool()?;
        let sql = postgres_to_sqlite(sql);
        let rows = sqlx::query_as_with(&sql, bind(args)?)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn execute(&self, sql: &str, args: &[SqlValue]) -> Result<ExecResult, StorageError> {
        let pool = self.pool()?;
        let sql = postgres_to_sqlite(sql);
        let result = sqlx::query_with(&sql, bind(args)?).execute(pool).await?;
        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: Some(result.last_insert_rowid()),
        })
    }

    fn pool(&self) -> Result<&SqlitePool, StorageError> {
        self.pool
            .as_ref()
            .filter(|pool| !pool.is_closed())
            .ok_or(StorageError::NotConnected)
    }
}

fn bind<'q>(args: &[SqlValue]) -> Result<SqliteArguments<'q>, StorageError> {
    let mut arguments = SqliteArguments::default();
    for arg in args {
        let added = match arg {
            SqlValue::Text(value) => arguments.add(value.clone()),
            SqlValue::Integer(value) => arguments.add(*value),
            SqlValue::Null => arguments.add(None::<String>),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(arguments)
}
