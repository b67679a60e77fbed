//! JSON output formatting for taskpulse.

use serde::Serialize;
use serde_json::json;

use crate::core::MonthKey;
use crate::error::PulseError;
use crate::features::stats::{AccuracyStats, MonthlySummary, ProductiveDay};
use crate::tasks::Task;

/// Format tasks as JSON
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[Task], title: &str) -> Result<String, PulseError> {
    let output = json!({
        "list": title,
        "count": tasks.len(),
        "items": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format summaries as JSON, most recent month first
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_summaries_json(summaries: &[MonthlySummary]) -> Result<String, PulseError> {
    let output = json!({
        "count": summaries.len(),
        "items": summaries
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a month's accuracy stats as JSON
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_accuracy_json(
    month: MonthKey,
    stats: &AccuracyStats,
    insight: Option<&str>,
) -> Result<String, PulseError> {
    let output = json!({
        "month": month,
        "stats": stats,
        "insight": insight
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a month's weekday distribution as JSON
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_productive_day_json(month: MonthKey, day: &ProductiveDay) -> Result<String, PulseError> {
    let output = json!({
        "month": month,
        "most_productive_day": day.day,
        "count": day.count,
        "by_weekday": day.by_weekday
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, PulseError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::stats::summary::tests::stored;
    use crate::tasks::fixtures::{at, done, estimated, pending};

    fn september() -> MonthKey {
        "2025-09".parse().unwrap()
    }

    #[test]
    fn test_format_tasks_json_empty_list() {
        let result = format_tasks_json(&[], "Tasks").unwrap();

        assert!(result.contains("\"list\": \"Tasks\""));
        assert!(result.contains("\"count\": 0"));
        assert!(result.contains("\"items\": []"));
    }

    #[test]
    fn test_format_tasks_json_fields() {
        let mut task = done(7, at(2025, 9, 1, 8), at(2025, 9, 1, 10));
        task.tags = vec!["work".to_string()];
        let result = format_tasks_json(&[task, pending(8, at(2025, 9, 2, 8))], "September").unwrap();

        assert!(result.contains("\"count\": 2"));
        assert!(result.contains("\"id\": 7"));
        assert!(result.contains("\"is_completed\": true"));
        assert!(result.contains("\"completed_at\": \"2025-09-01T10:00:00Z\""));
        assert!(result.contains("\"work\""));
        assert!(result.contains("\"completed_at\": null"));
    }

    #[test]
    fn test_format_summaries_json() {
        let summaries = vec![stored(september(), 80, Some(72))];
        let result = format_summaries_json(&summaries).unwrap();

        assert!(result.contains("\"count\": 1"));
        assert!(result.contains("\"month\": \"2025-09\""));
        assert!(result.contains("\"completion_rate\": 80"));
        assert!(result.contains("\"estimation_accuracy\": 72"));
    }

    #[test]
    fn test_format_accuracy_json() {
        let stats = AccuracyStats::calculate(&[estimated(1, 30, 60)]);
        let result = format_accuracy_json(september(), &stats, Some("ran long")).unwrap();

        assert!(result.contains("\"month\": \"2025-09\""));
        assert!(result.contains("\"accuracy\": 50"));
        assert!(result.contains("\"underestimated_count\": 1"));
        assert!(result.contains("\"insight\": \"ran long\""));
    }

    #[test]
    fn test_format_accuracy_json_without_data() {
        let result = format_accuracy_json(september(), &AccuracyStats::default(), None).unwrap();

        assert!(result.contains("\"accuracy\": null"));
        assert!(result.contains("\"insight\": null"));
    }

    #[test]
    fn test_format_productive_day_json() {
        let day = ProductiveDay::calculate(&[done(1, at(2025, 9, 1, 8), at(2025, 9, 3, 8))]);
        let result = format_productive_day_json(september(), &day).unwrap();

        assert!(result.contains("\"most_productive_day\": \"Wednesday\""));
        assert!(result.contains("\"count\": 1"));
    }

    #[test]
    fn test_json_preserves_special_characters() {
        let mut task = pending(1, at(2025, 9, 1, 8));
        task.title = "Task with \"quotes\" and \\ backslashes".to_string();
        task.description = Some("Line 1\nLine 2\tTabbed".to_string());
        let result = to_json(&task).unwrap();

        assert!(result.contains("\\\"quotes\\\""));
        assert!(result.contains("\\\\"));
        assert!(result.contains("\\n"));
        assert!(result.contains("\\t"));
    }
}
