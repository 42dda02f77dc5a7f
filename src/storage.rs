//! Storage Layer
//!
//! A single shared database handle over SQLite or PostgreSQL.
//!
//! # Components
//!
//! - [`db::Database`]: Backend-agnostic connect/close/query/execute
//! - [`PersonStore`]: Latest-persons read and person insert
//! - [`StorageBuilder`] / [`StorageHandles`]: Connect, migrate and lifecycle management

mod builder;
pub mod db;
mod error;
pub mod person_store;
pub mod schema;
mod types;

pub use builder::{StorageBuilder, StorageHandles};
pub use error::StorageError;
pub use person_store::{LATEST_LIMIT, PersonStore};
pub use types::{ExecResult, NewPerson, Person, SqlValue};
