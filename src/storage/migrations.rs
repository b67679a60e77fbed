//! Database migrations for taskpulse.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;

use crate::error::PulseError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, PulseError> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| PulseError::Database(format!("Failed to get schema version: {e}")))?;

    Ok(version)
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), PulseError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| PulseError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), PulseError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        tracing::info!(version, "Running migration");
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    tracing::info!(from = current, to = CURRENT_VERSION, "Migrations complete");
    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), PulseError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(PulseError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: Initial schema.
///
/// Creates tables for:
/// - `tasks`: task records, tags stored as a JSON array
/// - `monthly_summaries`: one row per `YYYY-MM` month
fn migrate_v1(conn: &Connection) -> Result<(), PulseError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            completed_at TEXT,
            estimated_minutes INTEGER,
            actual_minutes INTEGER,
            is_completed INTEGER NOT NULL DEFAULT 0,
            tags TEXT NOT NULL DEFAULT '[]',
            CHECK (actual_minutes IS NULL OR is_completed = 1)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_created
        ON tasks(created_at);

        CREATE INDEX IF NOT EXISTS idx_tasks_completed
        ON tasks(completed_at);

        CREATE TABLE IF NOT EXISTS monthly_summaries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            month TEXT NOT NULL UNIQUE,
            total_tasks INTEGER NOT NULL DEFAULT 0,
            completed_tasks INTEGER NOT NULL DEFAULT 0,
            completion_rate INTEGER NOT NULL DEFAULT 0
                CHECK (completion_rate BETWEEN 0 AND 100),
            avg_duration_minutes INTEGER,
            estimation_accuracy INTEGER
                CHECK (estimation_accuracy IS NULL OR estimation_accuracy BETWEEN 0 AND 100),
            longest_streak INTEGER NOT NULL DEFAULT 0 CHECK (longest_streak >= 0),
            most_productive_day TEXT,
            celebration_message TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| PulseError::Database(format!("Migration v1 failed: {e}")))
}
