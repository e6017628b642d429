//! # rct-db
//!
//! libSQL persistence for the RCT data-capture service.
//!
//! Holds all relational state: studies, participants and their identifier
//! counters, visits, the per-visit data-entry records, questionnaire
//! templates and answers, and wearable samples. Repository methods live on
//! [`service::RctService`] as `impl RctService` blocks, one module per entity.
//!
//! Uses the `libsql` crate (C `SQLite` fork) in local mode.

pub mod error;
pub mod helpers;
pub mod media;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::{Builder, Connection};
use tokio::sync::{Mutex, MutexGuard};

const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Central database handle.
///
/// Wraps a libSQL database and a single connection behind an async mutex.
/// A repo method holds the guard for its whole duration, so statements of
/// concurrent requests never interleave inside a transaction.
pub struct RctDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: Mutex<Connection>,
}

impl RctDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
        // Wait for a competing writer (another process on the same file).
        conn.query(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"), ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;

        Self::run_migrations(&conn).await?;
        tracing::debug!(path, "database opened");
        Ok(Self {
            db,
            conn: Mutex::new(conn),
        })
    }

    /// Lock the connection for the duration of one repository operation.
    pub async fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> RctDb {
        RctDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        let conn = db.conn().await;

        let tables = [
            "studies",
            "participants",
            "participant_sequences",
            "visits",
            "clinical_assessments",
            "biological_samples",
            "neuroimaging",
            "questionnaire_templates",
            "questions",
            "choices",
            "visit_assessments",
            "answers",
            "wearable_data_points",
        ];
        for table in &tables {
            let mut rows = conn
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        let conn = db.conn().await;
        RctDb::run_migrations(&conn).await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = test_db().await;
        let conn = db.conn().await;
        let result = conn
            .execute(
                "INSERT INTO participants (participant_id, study_id, date_of_birth, gender)
                 VALUES ('DG-9-0001', 9, '1950-01-01', 'MALE')",
                (),
            )
            .await;
        assert!(result.is_err(), "participant without study should be rejected");
    }

    #[tokio::test]
    async fn visit_type_unique_per_participant() {
        let db = test_db().await;
        let conn = db.conn().await;
        conn.execute_batch(
            "INSERT INTO studies (id, name, start_date) VALUES (1, 'S', '2026-01-01');
             INSERT INTO participants (id, participant_id, study_id, date_of_birth, gender)
                 VALUES (1, 'DG-1-0001', 1, '1950-01-01', 'FEMALE');
             INSERT INTO visits (participant_id, visit_type, visit_date) VALUES (1, 'BASELINE', '2026-01-02');",
        )
        .await
        .unwrap();

        let result = conn
            .execute(
                "INSERT INTO visits (participant_id, visit_type, visit_date) VALUES (1, 'BASELINE', '2026-01-03')",
                (),
            )
            .await;
        assert!(result.is_err(), "duplicate visit type should be rejected");
    }
}
