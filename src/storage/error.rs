//! Storage-specific error types.
//!
//! All storage operations return [`StorageError`] on failure. Handlers turn
//! it into a `500` with the display text as body, so messages stay short.

use thiserror::Error;

/// Errors that can occur in the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database operation failed (sqlx error).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Operation issued before `connect` succeeded (or after `close`).
    #[error("database not connected")]
    NotConnected,

    /// The cancellation token fired before the statement completed.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal error (e.g., database directory creation failure).
    #[error("internal error: {0}")]
    Internal(String),

    /// Schema migration failed at startup.
    #[error("cannot migrate schema: {0}")]
    Migration(Box<StorageError>),
}
