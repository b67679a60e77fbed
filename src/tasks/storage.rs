//! Task storage.
//!
//! Persists tasks to the local database and serves them to the analytics
//! engine as a [`TaskSource`].

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, OptionalExtension, Row, ToSql};

use super::types::{NewTask, Task, TaskFilter};
use crate::core::TaskSource;
use crate::error::PulseError;
use crate::storage::Database;

const TASK_COLUMNS: &str = "id, title, description, created_at, completed_at, \
                            estimated_minutes, actual_minutes, is_completed, tags";

/// Storage for tasks.
pub struct TaskStorage<'a> {
    db: &'a Database,
}

impl<'a> TaskStorage<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new task and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add(&self, task: &NewTask) -> Result<Task, PulseError> {
        let conn = self.db.connection();
        let created_at = task.created_at.unwrap_or_else(Utc::now);
        let tags = serde_json::to_string(&task.tags)?;

        conn.execute(
            r"INSERT INTO tasks (title, description, created_at, estimated_minutes, is_completed, tags)
              VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![
                task.title,
                task.description,
                timestamp(created_at),
                task.estimated_minutes,
                tags,
            ],
        )
        .map_err(|e| PulseError::Database(format!("Failed to insert task: {e}")))?;

        let id = conn.last_insert_rowid();
        tracing::debug!(id, title = %task.title, "Added task");
        self.require(id)
    }

    /// Get a task by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<Task>, PulseError> {
        self.db
            .connection()
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                [id],
                row_to_task,
            )
            .optional()
            .map_err(|e| PulseError::Database(format!("Failed to query task {id}: {e}")))
    }

    fn require(&self, id: i64) -> Result<Task, PulseError> {
        self.get(id)?
            .ok_or_else(|| PulseError::NotFound(format!("task {id}")))
    }

    /// Mark a task completed at `at`.
    ///
    /// Without an explicit `actual_minutes`, the duration is derived from the
    /// creation and completion timestamps in whole minutes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown task, `InvalidInput` for a negative
    /// duration, or a database error if the update fails.
    pub fn complete(
        &self,
        id: i64,
        at: DateTime<Utc>,
        actual_minutes: Option<i64>,
    ) -> Result<Task, PulseError> {
        let task = self.require(id)?;
        if actual_minutes.is_some_and(|m| m < 0) {
            return Err(PulseError::InvalidInput(
                "actual minutes cannot be negative".to_string(),
            ));
        }
        let actual = actual_minutes.unwrap_or_else(|| (at - task.created_at).num_minutes().max(0));

        self.db
            .connection()
            .execute(
                r"UPDATE tasks SET completed_at = ?1, actual_minutes = ?2, is_completed = 1
                  WHERE id = ?3",
                params![timestamp(at), actual, id],
            )
            .map_err(|e| PulseError::Database(format!("Failed to complete task {id}: {e}")))?;

        tracing::debug!(id, actual_minutes = actual, "Completed task");
        self.require(id)
    }

    /// Reopen a completed task, clearing its completion data.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown task or a database error if the update fails.
    pub fn reopen(&self, id: i64) -> Result<Task, PulseError> {
        self.require(id)?;

        self.db
            .connection()
            .execute(
                r"UPDATE tasks SET completed_at = NULL, actual_minutes = NULL, is_completed = 0
                  WHERE id = ?1",
                [id],
            )
            .map_err(|e| PulseError::Database(format!("Failed to reopen task {id}: {e}")))?;

        self.require(id)
    }

    /// Delete a task. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool, PulseError> {
        let rows = self
            .db
            .connection()
            .execute("DELETE FROM tasks WHERE id = ?1", [id])
            .map_err(|e| PulseError::Database(format!("Failed to delete task {id}: {e}")))?;

        Ok(rows > 0)
    }
}

impl TaskSource for TaskStorage<'_> {
    fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, PulseError> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        let bounds = [
            (filter.created_after, "created_at >= ?"),
            (filter.created_before, "created_at < ?"),
            (filter.completed_after, "completed_at >= ?"),
            (filter.completed_before, "completed_at < ?"),
        ];
        for (bound, clause) in bounds {
            if let Some(at) = bound {
                clauses.push(clause);
                values.push(Box::new(timestamp(at)));
            }
        }
        if let Some(is_completed) = filter.is_completed {
            clauses.push("is_completed = ?");
            values.push(Box::new(is_completed));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks {where_sql} ORDER BY created_at, id");

        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| PulseError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params_from_iter(values.iter()), row_to_task)
            .map_err(|e| PulseError::Database(format!("Failed to query tasks: {e}")))?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(|e| PulseError::Database(e.to_string()))?);
        }

        tracing::trace!(count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }
}

/// Timestamps are stored as second-precision RFC 3339 in UTC, which sorts
/// lexically in time order.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Convert a database row to a Task.
fn row_to_task(row: &Row<'_>) -> Result<Task, rusqlite::Error> {
    let created_at: String = row.get(3)?;
    let completed_at: Option<String> = row.get(4)?;
    let tags: String = row.get(8)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        created_at: parse_timestamp(3, &created_at)?,
        completed_at: completed_at
            .as_deref()
            .map(|raw| parse_timestamp(4, raw))
            .transpose()?,
        estimated_minutes: row.get(5)?,
        actual_minutes: row.get(6)?,
        is_completed: row.get(7)?,
        tags: serde_json::from_str(&tags)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MonthKey;
    use crate::tasks::fixtures::at;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);

        let added = storage
            .add(
                &NewTask::new("Draft slides")
                    .with_estimate(30)
                    .with_tags(vec!["work".to_string(), "deck".to_string()])
                    .created_at(at(2025, 9, 2, 9)),
            )
            .unwrap();

        let loaded = storage.get(added.id).unwrap().unwrap();
        assert_eq!(loaded, added);
        assert_eq!(loaded.title, "Draft slides");
        assert_eq!(loaded.estimated_minutes, Some(30));
        assert_eq!(loaded.tags, vec!["work", "deck"]);
        assert!(!loaded.is_completed);
        assert!(loaded.actual_minutes.is_none());
    }

    #[test]
    fn test_complete_derives_actual_minutes() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);
        let task = storage
            .add(&NewTask::new("Call bank").created_at(at(2025, 9, 2, 9)))
            .unwrap();

        let done = storage.complete(task.id, at(2025, 9, 2, 11), None).unwrap();
        assert!(done.is_completed);
        assert_eq!(done.actual_minutes, Some(120));
        assert_eq!(done.completed_at, Some(at(2025, 9, 2, 11)));
    }

    #[test]
    fn test_complete_with_explicit_actual() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);
        let task = storage.add(&NewTask::new("Run")).unwrap();

        let done = storage.complete(task.id, Utc::now(), Some(42)).unwrap();
        assert_eq!(done.actual_minutes, Some(42));

        assert!(matches!(
            storage.complete(task.id, Utc::now(), Some(-1)),
            Err(PulseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_complete_unknown_task() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);

        assert!(matches!(
            storage.complete(99, Utc::now(), None),
            Err(PulseError::NotFound(_))
        ));
    }

    #[test]
    fn test_reopen_clears_completion() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);
        let task = storage.add(&NewTask::new("Laundry")).unwrap();
        storage.complete(task.id, Utc::now(), Some(10)).unwrap();

        let reopened = storage.reopen(task.id).unwrap();
        assert!(!reopened.is_completed);
        assert!(reopened.completed_at.is_none());
        assert!(reopened.actual_minutes.is_none());
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);
        let task = storage.add(&NewTask::new("Temp")).unwrap();

        assert!(storage.delete(task.id).unwrap());
        assert!(!storage.delete(task.id).unwrap());
        assert!(storage.get(task.id).unwrap().is_none());
    }

    #[test]
    fn test_find_tasks_created_in_month() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);
        for (title, created) in [
            ("august", at(2025, 8, 31, 23)),
            ("first", at(2025, 9, 1, 0)),
            ("last", at(2025, 9, 30, 23)),
            ("october", at(2025, 10, 1, 0)),
        ] {
            storage.add(&NewTask::new(title).created_at(created)).unwrap();
        }

        let found = storage
            .find_tasks(&TaskFilter::created_in(month("2025-09")))
            .unwrap();
        let titles: Vec<&str> = found.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "last"]);
    }

    #[test]
    fn test_find_tasks_agrees_with_in_memory_filter() {
        let db = Database::open_in_memory().unwrap();
        let storage = TaskStorage::new(&db);
        let a = storage
            .add(&NewTask::new("a").created_at(at(2025, 9, 1, 8)))
            .unwrap();
        storage
            .add(&NewTask::new("b").created_at(at(2025, 9, 3, 8)))
            .unwrap();
        storage.complete(a.id, at(2025, 9, 4, 8), None).unwrap();

        let all = storage.find_tasks(&TaskFilter::default()).unwrap();
        let filter = TaskFilter::completed_in(month("2025-09"));
        let from_sql = storage.find_tasks(&filter).unwrap();
        let in_memory: Vec<Task> = all.into_iter().filter(|t| filter.matches(t)).collect();

        assert_eq!(from_sql, in_memory);
        assert_eq!(from_sql.len(), 1);

        let pending = storage
            .find_tasks(&TaskFilter::default().completed(false))
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "b");
    }
}
