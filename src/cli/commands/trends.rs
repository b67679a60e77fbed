//! Trend command implementation.

use serde_json::json;

use crate::cli::args::{OutputFormat, TrendsCommands};
use crate::config::StatsConfig;
use crate::core::MonthKey;
use crate::error::PulseError;
use crate::features::stats::{SummaryStorage, TrendAnalyzer};
use crate::output::{format_comparison, format_history, to_json};
use crate::storage::Database;

/// Execute trends subcommands.
///
/// # Errors
///
/// Returns an error if stored summaries cannot be read or output formatting fails.
pub fn trends(
    db: &Database,
    cmd: TrendsCommands,
    settings: &StatsConfig,
    format: OutputFormat,
) -> Result<String, PulseError> {
    let store = SummaryStorage::new(db);
    let analyzer = TrendAnalyzer::new(&store);

    match cmd {
        TrendsCommands::Compare { month, offset } => {
            let month = month.unwrap_or_else(MonthKey::current);
            let offset = offset.unwrap_or(settings.compare_offset).max(1);
            match analyzer.compare_months(month, offset)? {
                Some(comparison) => format_comparison(&comparison, format),
                None => no_comparison(month, offset, format),
            }
        }
        TrendsCommands::History { months } => {
            let months = months.map_or(settings.history_months, usize::from).max(1);
            let history = analyzer.historical(MonthKey::current(), months)?;
            format_history(&history, format)
        }
    }
}

fn no_comparison(month: MonthKey, offset: u32, format: OutputFormat) -> Result<String, PulseError> {
    let previous = month.offset(-i32::try_from(offset).unwrap_or(i32::MAX));
    match format {
        OutputFormat::Json => to_json(&json!({
            "month": month,
            "previous_month": previous,
            "comparison": null
        })),
        OutputFormat::Pretty => Ok(format!(
            "No comparison available: {month} and {previous} both need a generated summary."
        )),
    }
}
