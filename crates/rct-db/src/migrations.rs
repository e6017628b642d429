//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` for idempotent re-running.

use libsql::Connection;

use crate::RctDb;
use crate::error::DatabaseError;

/// Initial schema: 13 tables, 6 indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl RctDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
        conn.execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
