//! Person storage.
//!
//! The two statements the application issues, written once with `$N`
//! placeholders for both backends.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::storage::db::Database;
use crate::storage::{ExecResult, NewPerson, Person, StorageError};

/// Number of persons shown on the index page.
pub const LATEST_LIMIT: i64 = 10;

const SELECT_LATEST_SQL: &str = r#"
    SELECT id, name, phone, company
    FROM persons
    ORDER BY id DESC
    LIMIT $1
"#;

const INSERT_PERSON_SQL: &str = "INSERT INTO persons (name, phone, company) VALUES ($1, $2, $3)";

/// Person storage facade over the shared database handle.
#[derive(Clone)]
pub struct PersonStore {
    db: Arc<Database>,
}

impl PersonStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The most recent persons, newest first.
    pub async fn latest(&self, limit: i64) -> Result<Vec<Person>, StorageError> {
        self.db.query(SELECT_LATEST_SQL, &[limit.into()]).await
    }

    /// Insert a person, abandoning the statement if `cancel` fires.
    pub async fn insert(
        &self,
        cancel: &CancellationToken,
        person: &NewPerson,
    ) -> Result<ExecResult, StorageError> {
        self.db
            .execute_cancellable(
                cancel,
                INSERT_PERSON_SQL,
                &[
                    person.name.as_str().into(),
                    person.phone.as_str().into(),
                    person.company.as_str().into(),
                ],
            )
            .await
    }
}
