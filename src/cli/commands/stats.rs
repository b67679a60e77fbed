//! Accuracy, streak and weekday command implementations.

use chrono::{NaiveDate, Utc};

use crate::cli::args::OutputFormat;
use crate::core::{MonthKey, TaskSource};
use crate::error::PulseError;
use crate::features::stats::{accuracy_insight, AccuracyStats, ProductiveDay, StreakInfo, Tone};
use crate::output::{format_accuracy, format_productive_day, format_streak};
use crate::storage::Database;
use crate::tasks::{TaskFilter, TaskStorage};

/// Execute accuracy command
///
/// With `compare`, the month before is scored too and the stats carry a trend.
///
/// # Errors
///
/// Returns an error if the task query fails or output formatting fails.
pub fn accuracy(
    db: &Database,
    month: Option<MonthKey>,
    compare: bool,
    tone: Tone,
    format: OutputFormat,
) -> Result<String, PulseError> {
    let month = month.unwrap_or_else(MonthKey::current);
    let storage = TaskStorage::new(db);
    let current = storage.find_tasks(&TaskFilter::created_in(month))?;

    let stats = if compare {
        let previous = storage.find_tasks(&TaskFilter::created_in(month.previous()))?;
        AccuracyStats::calculate_with_trend(&current, &previous)
    } else {
        AccuracyStats::calculate(&current)
    };
    tracing::debug!(%month, analyzed = stats.tasks_analyzed, "Scored estimates");

    let insight = accuracy_insight(&stats, tone);
    format_accuracy(month, &stats, insight.as_deref(), format)
}

/// Execute streak command
///
/// # Errors
///
/// Returns an error if the task query fails or output formatting fails.
pub fn streak(db: &Database, format: OutputFormat) -> Result<String, PulseError> {
    streak_as_of(db, Utc::now().date_naive(), format)
}

fn streak_as_of(db: &Database, today: NaiveDate, format: OutputFormat) -> Result<String, PulseError> {
    let completed = TaskStorage::new(db).find_tasks(&TaskFilter::default().completed(true))?;
    format_streak(&StreakInfo::calculate(&completed, today), format)
}

/// Execute days command
///
/// # Errors
///
/// Returns an error if the task query fails or output formatting fails.
pub fn days(db: &Database, month: Option<MonthKey>, format: OutputFormat) -> Result<String, PulseError> {
    let month = month.unwrap_or_else(MonthKey::current);
    let tasks = TaskStorage::new(db).find_tasks(&TaskFilter::created_in(month))?;
    format_productive_day(month, &ProductiveDay::calculate(&tasks), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::fixtures::at;
    use crate::tasks::NewTask;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn add_done(db: &Database, title: &str, created: (u32, u32), estimate: i64, actual: i64) {
        let tasks = TaskStorage::new(db);
        let (m, d) = created;
        let task = tasks
            .add(&NewTask::new(title).with_estimate(estimate).created_at(at(2025, m, d, 9)))
            .unwrap();
        tasks.complete(task.id, at(2025, m, d, 17), Some(actual)).unwrap();
    }

    #[test]
    fn test_accuracy_for_month() {
        let db = Database::open_in_memory().unwrap();
        add_done(&db, "Exact", (9, 1), 60, 60);
        add_done(&db, "Long", (9, 2), 30, 60);

        let out = accuracy(&db, Some(month("2025-09")), false, Tone::Neutral, OutputFormat::Json).unwrap();
        assert!(out.contains("\"accuracy\": 75"));
        assert!(out.contains("\"tasks_analyzed\": 2"));
        assert!(out.contains("\"trend\": null"));
    }

    #[test]
    fn test_accuracy_compare_adds_trend() {
        let db = Database::open_in_memory().unwrap();
        add_done(&db, "August", (8, 5), 30, 60);
        add_done(&db, "September", (9, 5), 60, 60);

        let out = accuracy(&db, Some(month("2025-09")), true, Tone::Neutral, OutputFormat::Json).unwrap();
        assert!(out.contains("\"accuracy\": 100"));
        assert!(out.contains("\"direction\": \"up\""));
    }

    #[test]
    fn test_accuracy_empty_month() {
        let db = Database::open_in_memory().unwrap();
        let out = accuracy(&db, Some(month("2025-09")), true, Tone::Upbeat, OutputFormat::Json).unwrap();
        assert!(out.contains("\"accuracy\": null"));
        assert!(out.contains("\"insight\": null"));
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let db = Database::open_in_memory().unwrap();
        add_done(&db, "One", (9, 1), 30, 30);
        add_done(&db, "Two", (9, 2), 30, 30);
        add_done(&db, "Three", (9, 3), 30, 30);

        let today = NaiveDate::from_ymd_opt(2025, 9, 4).unwrap();
        let out = streak_as_of(&db, today, OutputFormat::Json).unwrap();
        assert!(out.contains("\"current\": 3"));
        assert!(out.contains("\"longest\": 3"));
    }

    #[test]
    fn test_days_picks_weekday() {
        let db = Database::open_in_memory().unwrap();
        // 2025-09-03 and 2025-09-10 are Wednesdays.
        add_done(&db, "One", (9, 3), 30, 30);
        add_done(&db, "Two", (9, 10), 30, 30);
        add_done(&db, "Three", (9, 1), 30, 30);

        let out = days(&db, Some(month("2025-09")), OutputFormat::Json).unwrap();
        assert!(out.contains("\"most_productive_day\": \"Wednesday\""));
        assert!(out.contains("\"count\": 2"));
    }
}
