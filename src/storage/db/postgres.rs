//! PostgreSQL backend implementation using sqlx.
//!
//! Statements already use native `$N` placeholders and are passed through.

use sqlx::Arguments;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgRow};

use super::DatabaseOptions;
use super::retry::retry_with_backoff;
use crate::storage::{ExecResult, SqlValue, StorageError};

/// PostgreSQL database handle.
#[derive(Default)]
pub struct PostgresDatabase {
    options: DatabaseOptions,
    pool: Option<PgPool>,
}

impl std::fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("connected", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

impl PostgresDatabase {
    pub fn new(options: DatabaseOptions) -> Self {
        Self {
            options,
            pool: None,
        }
    }

    /// Connect to the server, retrying with exponential backoff.
    ///
    /// Each attempt opens the pool and its first connection, so a reachable
    /// but misconfigured server also counts as a failed attempt. The error of
    /// the last attempt is returned once the retry policy is exhausted.
    pub async fn connect(&mut self, dsn: &str) -> Result<(), StorageError> {
        let pool_options = PgPoolOptions::new()
            .max_connections(self.options.max_connections)
            .acquire_timeout(self.options.acquire_timeout);

        let pool = retry_with_backoff(&self.options.retry, || {
            let pool_options = pool_options.clone();
            async move { pool_options.connect(dsn).await }
        })
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
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let pool = self.pool()?;
        let rows = sqlx::query_as_with(sql, bind(args)?)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn execute(&self, sql: &str, args: &[SqlValue]) -> Result<ExecResult, StorageError> {
        let pool = self.pool()?;
        let result = sqlx::query_with(sql, bind(args)?).execute(pool).await?;
        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: None,
        })
    }

    fn pool(&self) -> Result<&PgPool, StorageError> {
        self.pool
            .as_ref()
            .filter(|pool| !pool.is_closed())
            .ok_or(StorageError::NotConnected)
    }
}

fn bind(args: &[SqlValue]) -> Result<PgArguments, StorageError> {
    let mut arguments = PgArguments::default();
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
