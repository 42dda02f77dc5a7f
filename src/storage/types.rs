//! Core data types for the storage layer.
//!
//! - [`Person`]: a stored row, identifier assigned by the database
//! - [`NewPerson`]: insert payload without an identifier
//! - [`SqlValue`]: a bound statement argument
//! - [`ExecResult`]: summary of a write statement

use serde::{Deserialize, Serialize};

/// A person row stored in the `persons` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    /// Database-assigned identifier, monotonically increasing.
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub company: String,
}

/// A person about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub phone: String,
    pub company: String,
}

impl NewPerson {
    /// Create a new insert payload.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            company: company.into(),
        }
    }
}

/// A positional statement argument.
///
/// Arguments bind in slice order to `$1`, `$2`, ... (or `?` after
/// normalization for SQLite).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Null,
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Result summary of a write statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Number of rows changed by the statement.
    pub rows_affected: u64,
    /// Row id of the last insert, when the backend reports one (SQLite only).
    pub last_insert_id: Option<i64>,
}
