//! Monthly summary command implementation.

use serde_json::json;

use crate::cli::args::{OutputFormat, SummaryCommands};
use crate::core::{MonthKey, SummaryStore};
use crate::error::PulseError;
use crate::features::stats::{SummaryGenerator, SummaryStorage, Tone};
use crate::output::{format_summaries, format_summary, to_json};
use crate::storage::Database;
use crate::tasks::TaskStorage;

/// Execute summary subcommands.
///
/// # Errors
///
/// Returns an error if storage fails, a requested summary does not exist,
/// or output formatting fails.
pub fn summary(
    db: &Database,
    cmd: SummaryCommands,
    tone: Tone,
    format: OutputFormat,
) -> Result<String, PulseError> {
    let tasks = TaskStorage::new(db);
    let store = SummaryStorage::new(db);

    match cmd {
        SummaryCommands::Generate { month } => {
            let month = month.unwrap_or_else(MonthKey::current);
            let saved = SummaryGenerator::new(&tasks, &store)
                .with_tone(tone)
                .generate(month)?;
            format_summary(&saved, format)
        }
        SummaryCommands::Show { month } => {
            let month = month.unwrap_or_else(MonthKey::current);
            let found = store.find_by_month(month)?.ok_or_else(|| {
                PulseError::NotFound(format!(
                    "no summary for {month}; run `taskpulse summary generate {month}`"
                ))
            })?;
            format_summary(&found, format)
        }
        SummaryCommands::List { limit } => format_summaries(&store.find_all(limit)?, format),
        SummaryCommands::Delete { month } => {
            if !store.delete(month)? {
                return Err(PulseError::NotFound(format!("no summary for {month}")));
            }
            match format {
                OutputFormat::Json => to_json(&json!({ "deleted": true, "month": month })),
                OutputFormat::Pretty => Ok(format!("Deleted summary for {month}")),
            }
        }
    }
}
