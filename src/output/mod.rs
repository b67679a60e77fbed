//! Output formatting for taskpulse.
//!
//! Every command result can be printed for people (`pretty`) or for scripts
//! (`json`).

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::core::MonthKey;
use crate::error::PulseError;
use crate::features::stats::{
    AccuracyStats, HistoricalTrends, MonthComparison, MonthlySummary, ProductiveDay, StreakInfo,
};
use crate::tasks::Task;

pub use json::*;
pub use pretty::*;

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_tasks(tasks: &[Task], title: &str, format: OutputFormat) -> Result<String, PulseError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks, title)),
        OutputFormat::Json => format_tasks_json(tasks, title),
    }
}

/// Format a single task based on output format
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_task(task: &Task, format: OutputFormat) -> Result<String, PulseError> {
    match format {
        OutputFormat::Pretty => Ok(format_task_pretty(task)),
        OutputFormat::Json => to_json(task),
    }
}

/// Format a monthly summary based on output format
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_summary(summary: &MonthlySummary, format: OutputFormat) -> Result<String, PulseError> {
    match format {
        OutputFormat::Pretty => Ok(format_summary_pretty(summary)),
        OutputFormat::Json => to_json(summary),
    }
}

/// Format stored summaries based on output format
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_summaries(
    summaries: &[MonthlySummary],
    format: OutputFormat,
) -> Result<String, PulseError> {
    match format {
        OutputFormat::Pretty => Ok(format_summaries_pretty(summaries)),
        OutputFormat::Json => format_summaries_json(summaries),
    }
}

/// Format accuracy stats based on output format
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_accuracy(
    month: MonthKey,
    stats: &AccuracyStats,
    insight: Option<&str>,
    format: OutputFormat,
) -> Result<String, PulseError> {
    match format {
        OutputFormat::Pretty => Ok(format_accuracy_pretty(month, stats, insight)),
        OutputFormat::Json => format_accuracy_json(month, stats, insight),
    }
}

/// Format streak information based on output format
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_streak(streak: &StreakInfo, format: OutputFormat) -> Result<String, PulseError> {
    match format {
        OutputFormat::Pretty => Ok(format_streak_pretty(streak)),
        OutputFormat::Json => to_json(streak),
    }
}

/// Format a weekday distribution based on output format
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_productive_day(
    month: MonthKey,
    day: &ProductiveDay,
    format: OutputFormat,
) -> Result<String, PulseError> {
    match format {
        OutputFormat::Pretty => Ok(format_productive_day_pretty(month, day)),
        OutputFormat::Json => format_productive_day_json(month, day),
    }
}

/// Format a month comparison based on output format
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_comparison(
    comparison: &MonthComparison,
    format: OutputFormat,
) -> Result<String, PulseError> {
    match format {
        OutputFormat::Pretty => Ok(format_comparison_pretty(comparison)),
        OutputFormat::Json => to_json(comparison),
    }
}

/// Format a historical trend window based on output format
///
/// # Errors
///
/// Returns `PulseError::Parse` if JSON serialization fails.
pub fn format_history(history: &HistoricalTrends, format: OutputFormat) -> Result<String, PulseError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(history)),
        OutputFormat::Json => to_json(history),
    }
}
