//! Monthly summary storage.
//!
//! Persists one summary per month key. Saving an existing month replaces its
//! metric fields in place.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

use super::summary::{MonthlySummary, SummaryDraft};
use crate::core::{MonthKey, SummaryStore};
use crate::error::PulseError;
use crate::storage::Database;

const SUMMARY_COLUMNS: &str = "id, month, total_tasks, completed_tasks, completion_rate, \
                               avg_duration_minutes, estimation_accuracy, longest_streak, \
                               most_productive_day, celebration_message, created_at, updated_at";

/// Storage for monthly summaries.
pub struct SummaryStorage<'a> {
    db: &'a Database,
}

impl<'a> SummaryStorage<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Delete the summary for `month`. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, month: MonthKey) -> Result<bool, PulseError> {
        let rows = self
            .db
            .connection()
            .execute(
                "DELETE FROM monthly_summaries WHERE month = ?1",
                [month.to_string()],
            )
            .map_err(|e| PulseError::Database(format!("Failed to delete summary {month}: {e}")))?;

        Ok(rows > 0)
    }

    fn require(&self, month: MonthKey) -> Result<MonthlySummary, PulseError> {
        self.find_by_month(month)?
            .ok_or_else(|| PulseError::NotFound(format!("summary for {month}")))
    }
}

impl SummaryStore for SummaryStorage<'_> {
    fn save(&self, draft: &SummaryDraft) -> Result<MonthlySummary, PulseError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        self.db
            .connection()
            .execute(
                r"INSERT INTO monthly_summaries
                  (month, total_tasks, completed_tasks, completion_rate, avg_duration_minutes,
                   estimation_accuracy, longest_streak, most_productive_day, celebration_message,
                   created_at, updated_at)
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
                  ON CONFLICT(month) DO UPDATE SET
                    total_tasks = excluded.total_tasks,
                    completed_tasks = excluded.completed_tasks,
                    completion_rate = excluded.completion_rate,
                    avg_duration_minutes = excluded.avg_duration_minutes,
                    estimation_accuracy = excluded.estimation_accuracy,
                    longest_streak = excluded.longest_streak,
                    most_productive_day = excluded.most_productive_day,
                    celebration_message = excluded.celebration_message,
                    updated_at = excluded.updated_at",
                params![
                    draft.month.to_string(),
                    draft.total_tasks,
                    draft.completed_tasks,
                    draft.completion_rate,
                    draft.avg_duration_minutes,
                    draft.estimation_accuracy,
                    draft.longest_streak,
                    draft.most_productive_day,
                    draft.celebration_message,
                    now,
                ],
            )
            .map_err(|e| {
                PulseError::Database(format!("Failed to save summary {}: {e}", draft.month))
            })?;

        self.require(draft.month)
    }

    fn find_by_month(&self, month: MonthKey) -> Result<Option<MonthlySummary>, PulseError> {
        self.db
            .connection()
            .query_row(
                &format!("SELECT {SUMMARY_COLUMNS} FROM monthly_summaries WHERE month = ?1"),
                [month.to_string()],
                row_to_summary,
            )
            .optional()
            .map_err(|e| PulseError::Database(format!("Failed to query summary {month}: {e}")))
    }

    fn find_all(&self, limit: Option<usize>) -> Result<Vec<MonthlySummary>, PulseError> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));

        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SUMMARY_COLUMNS} FROM monthly_summaries ORDER BY month DESC LIMIT ?1"
            ))
            .map_err(|e| PulseError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([limit], row_to_summary)
            .map_err(|e| PulseError::Database(format!("Failed to query summaries: {e}")))?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row.map_err(|e| PulseError::Database(e.to_string()))?);
        }
        Ok(summaries)
    }
}

fn text_column<T, E>(idx: usize, parsed: Result<T, E>) -> Result<T, rusqlite::Error>
where
    E: std::error::Error + Send + Sync + 'static,
{
    parsed.map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(idx: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    text_column(idx, DateTime::parse_from_rfc3339(raw)).map(|t| t.with_timezone(&Utc))
}

/// Convert a database row to a `MonthlySummary`.
fn row_to_summary(row: &Row<'_>) -> Result<MonthlySummary, rusqlite::Error> {
    let month: String = row.get(1)?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    Ok(MonthlySummary {
        id: row.get(0)?,
        month: text_column(1, month.parse::<MonthKey>())?,
        total_tasks: row.get(2)?,
        completed_tasks: row.get(3)?,
        completion_rate: row.get(4)?,
        avg_duration_minutes: row.get(5)?,
        estimation_accuracy: row.get(6)?,
        longest_streak: row.get(7)?,
        most_productive_day: row.get(8)?,
        celebration_message: row.get(9)?,
        created_at: parse_timestamp(10, &created_at)?,
        updated_at: parse_timestamp(11, &updated_at)?,
    })
}
