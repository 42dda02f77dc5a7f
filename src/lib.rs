//! litebench - fake person records over SQLite or PostgreSQL
//!
//! A small web application that inserts randomly generated persons into a
//! relational database and lists the most recent ones. The backend is
//! chosen at startup; SQL is written once with `$N` placeholders and
//! normalized for SQLite.
//!
//! # Architecture
//!
//! - **Config**: Command-line values validated into an [`AppConfig`]
//! - **Storage**: [`storage::db::Database`] over both backends, schema migration, [`PersonStore`]
//! - **Server**: Axum router with the list and insert handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use litebench::{DatabaseDriver, StorageBuilder, server::{AppState, create_router}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handles = StorageBuilder::new(DatabaseDriver::Sqlite, "data/persons.db")
//!         .build()
//!         .await?;
//!     let app = create_router(AppState::new(handles.persons.clone()));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod fake;
pub mod server;
pub mod storage;

pub use config::{AppConfig, ConfigError, DatabaseDriver};
pub use storage::{NewPerson, Person, PersonStore, StorageBuilder, StorageError, StorageHandles};
