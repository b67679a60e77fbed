//! Command implementations for taskpulse.
//!
//! Every command returns the text to print; `main` only decides where it goes.

mod chart;
mod stats;
mod summary;
mod trends;

pub use chart::chart;
pub use stats::{accuracy, days, streak};
pub use summary::summary;
pub use trends::trends;

use chrono::{DateTime, Utc};
use clap::CommandFactory;
use clap_complete::Shell;
use serde_json::json;

use crate::cli::args::{AddArgs, Cli, ListArgs, OutputFormat};
use crate::core::TaskSource;
use crate::error::PulseError;
use crate::output::{format_task, format_tasks, to_json};
use crate::storage::Database;
use crate::tasks::{NewTask, TaskFilter, TaskStorage};

/// Execute add command
///
/// # Errors
///
/// Returns an error if the title is blank, the insert fails, or output
/// formatting fails.
pub fn add(db: &Database, args: AddArgs, format: OutputFormat) -> Result<String, PulseError> {
    let title = args.title.trim();
    if title.is_empty() {
        return Err(PulseError::InvalidInput("task title cannot be empty".to_string()));
    }

    let mut task = NewTask::new(title).with_tags(args.tags);
    if let Some(description) = args.description {
        task = task.with_description(description);
    }
    if let Some(minutes) = args.estimate {
        task = task.with_estimate(minutes);
    }
    if let Some(at) = args.at {
        task = task.created_at(at);
    }

    let stored = TaskStorage::new(db).add(&task)?;
    format_task(&stored, format)
}

/// Execute list command
///
/// # Errors
///
/// Returns an error if the query fails or output formatting fails.
pub fn list(db: &Database, args: &ListArgs, format: OutputFormat) -> Result<String, PulseError> {
    let mut filter = args.month.map(TaskFilter::created_in).unwrap_or_default();
    if args.completed {
        filter = filter.completed(true);
    } else if args.pending {
        filter = filter.completed(false);
    }

    let tasks = TaskStorage::new(db).find_tasks(&filter)?;
    let title = args
        .month
        .map_or_else(|| "Tasks".to_string(), |month| format!("Tasks {month}"));
    format_tasks(&tasks, &title, format)
}

/// Execute show command
///
/// # Errors
///
/// Returns `NotFound` for an unknown task.
pub fn show(db: &Database, id: i64, format: OutputFormat) -> Result<String, PulseError> {
    let task = TaskStorage::new(db)
        .get(id)?
        .ok_or_else(|| PulseError::NotFound(format!("task {id}")))?;
    format_task(&task, format)
}

/// Execute complete command
///
/// # Errors
///
/// Returns `NotFound` for an unknown task, or an error if the update fails.
pub fn complete(
    db: &Database,
    id: i64,
    actual: Option<i64>,
    at: Option<DateTime<Utc>>,
    format: OutputFormat,
) -> Result<String, PulseError> {
    let task = TaskStorage::new(db).complete(id, at.unwrap_or_else(Utc::now), actual)?;
    format_task(&task, format)
}

/// Execute reopen command
///
/// # Errors
///
/// Returns `NotFound` for an unknown task, or an error if the update fails.
pub fn reopen(db: &Database, id: i64, format: OutputFormat) -> Result<String, PulseError> {
    let task = TaskStorage::new(db).reopen(id)?;
    format_task(&task, format)
}

/// Execute delete command
///
/// # Errors
///
/// Returns `NotFound` for an unknown task, or an error if the delete fails.
pub fn delete(db: &Database, id: i64, format: OutputFormat) -> Result<String, PulseError> {
    if !TaskStorage::new(db).delete(id)? {
        return Err(PulseError::NotFound(format!("task {id}")));
    }
    match format {
        OutputFormat::Json => to_json(&json!({ "deleted": true, "id": id })),
        OutputFormat::Pretty => Ok(format!("Deleted task {id}")),
    }
}

/// Generate a completion script for `shell`.
///
/// # Errors
///
/// Returns `Parse` if the generated script is not valid UTF-8.
pub fn completions(shell: Shell) -> Result<String, PulseError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "taskpulse", &mut buf);
    String::from_utf8(buf).map_err(|e| PulseError::Parse(format!("completion script: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::fixtures::at;

    fn add_args(title: &str) -> AddArgs {
        AddArgs {
            title: title.to_string(),
            description: None,
            estimate: Some(30),
            tags: vec!["work".to_string()],
            at: Some(at(2025, 9, 1, 9)),
        }
    }

    fn list_args() -> ListArgs {
        ListArgs {
            month: None,
            completed: false,
            pending: false,
        }
    }

    #[test]
    fn test_add_and_show() {
        let db = Database::open_in_memory().unwrap();
        let added = add(&db, add_args("Write report"), OutputFormat::Json).unwrap();
        assert!(added.contains("\"title\": \"Write report\""));
        assert!(added.contains("\"estimated_minutes\": 30"));

        let shown = show(&db, 1, OutputFormat::Pretty).unwrap();
        assert!(shown.contains("Write report"));
    }

    #[test]
    fn test_add_rejects_blank_title() {
        let db = Database::open_in_memory().unwrap();
        let err = add(&db, add_args("   "), OutputFormat::Pretty).unwrap_err();
        assert!(matches!(err, PulseError::InvalidInput(_)));
    }

    #[test]
    fn test_complete_measures_duration() {
        let db = Database::open_in_memory().unwrap();
        add(&db, add_args("Write report"), OutputFormat::Json).unwrap();

        let done = complete(&db, 1, None, Some(at(2025, 9, 1, 10)), OutputFormat::Json).unwrap();
        assert!(done.contains("\"is_completed\": true"));
        assert!(done.contains("\"actual_minutes\": 60"));
    }

    #[test]
    fn test_list_filters_by_state() {
        let db = Database::open_in_memory().unwrap();
        add(&db, add_args("First"), OutputFormat::Json).unwrap();
        add(&db, add_args("Second"), OutputFormat::Json).unwrap();
        complete(&db, 1, Some(20), Some(at(2025, 9, 1, 12)), OutputFormat::Json).unwrap();

        let pending = ListArgs {
            pending: true,
            ..list_args()
        };
        let out = list(&db, &pending, OutputFormat::Json).unwrap();
        assert!(out.contains("\"count\": 1"));
        assert!(out.contains("Second"));
        assert!(!out.contains("First"));

        let all = list(&db, &list_args(), OutputFormat::Json).unwrap();
        assert!(all.contains("\"count\": 2"));
    }

    #[test]
    fn test_list_by_month() {
        let db = Database::open_in_memory().unwrap();
        add(&db, add_args("September"), OutputFormat::Json).unwrap();

        let october = ListArgs {
            month: Some("2025-10".parse().unwrap()),
            ..list_args()
        };
        let out = list(&db, &october, OutputFormat::Json).unwrap();
        assert!(out.contains("\"count\": 0"));
        assert!(out.contains("\"list\": \"Tasks 2025-10\""));
    }

    #[test]
    fn test_unknown_task_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(show(&db, 9, OutputFormat::Pretty), Err(PulseError::NotFound(_))));
        assert!(matches!(delete(&db, 9, OutputFormat::Pretty), Err(PulseError::NotFound(_))));
        assert!(matches!(
            complete(&db, 9, None, None, OutputFormat::Pretty),
            Err(PulseError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        add(&db, add_args("Temporary"), OutputFormat::Json).unwrap();

        assert_eq!(delete(&db, 1, OutputFormat::Pretty).unwrap(), "Deleted task 1");
        assert!(matches!(show(&db, 1, OutputFormat::Pretty), Err(PulseError::NotFound(_))));
    }

    #[test]
    fn test_completions_mention_binary() {
        let script = completions(Shell::Bash).unwrap();
        assert!(script.contains("taskpulse"));
    }
}
