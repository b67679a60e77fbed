//! Chart command implementation.

use colored::Colorize;
use serde_json::json;

use crate::cli::args::{ChartCommands, OutputFormat, SparkMetric};
use crate::config::StatsConfig;
use crate::core::{MonthKey, TaskSource};
use crate::error::PulseError;
use crate::features::stats::{
    render_sparkline, render_weekly_chart, HistoricalTrends, SummaryStorage, TrendAnalyzer,
    PERCENT_DOMAIN,
};
use crate::output::to_json;
use crate::storage::Database;
use crate::tasks::{TaskFilter, TaskStorage};

/// Execute chart subcommands.
///
/// # Errors
///
/// Returns an error if storage cannot be read or output formatting fails.
pub fn chart(
    db: &Database,
    cmd: ChartCommands,
    settings: &StatsConfig,
    format: OutputFormat,
) -> Result<String, PulseError> {
    match cmd {
        ChartCommands::Weekly { month } => {
            weekly(db, month.unwrap_or_else(MonthKey::current), format)
        }
        ChartCommands::Sparkline { metric, months } => {
            let months = months.map_or(settings.history_months, usize::from).max(1);
            let store = SummaryStorage::new(db);
            let history = TrendAnalyzer::new(&store).historical(MonthKey::current(), months)?;
            sparkline(&history, metric, format)
        }
    }
}

fn weekly(db: &Database, month: MonthKey, format: OutputFormat) -> Result<String, PulseError> {
    let tasks = TaskStorage::new(db).find_tasks(&TaskFilter::created_in(month))?;
    let chart = render_weekly_chart(&tasks, month);

    match format {
        OutputFormat::Json => to_json(&json!({
            "month": month,
            "total": tasks.len(),
            "completed": tasks.iter().filter(|t| t.is_completed).count(),
            "chart": chart
        })),
        OutputFormat::Pretty => Ok(format!(
            "{}\n{}\n{chart}",
            format!("Weekly completions {month}").bold(),
            "─".repeat(50)
        )),
    }
}

const fn metric_label(metric: SparkMetric) -> &'static str {
    match metric {
        SparkMetric::Completion => "Completion rate",
        SparkMetric::Accuracy => "Estimation accuracy",
        SparkMetric::Streak => "Longest streak",
    }
}

#[allow(clippy::cast_precision_loss)]
fn sparkline(
    history: &HistoricalTrends,
    metric: SparkMetric,
    format: OutputFormat,
) -> Result<String, PulseError> {
    let (values, domain, unit) = match metric {
        SparkMetric::Completion => (history.completion_rates(), PERCENT_DOMAIN, "%"),
        SparkMetric::Accuracy => (history.accuracies(), PERCENT_DOMAIN, "%"),
        // Streaks have no fixed ceiling; the renderer widens to the observed maximum.
        SparkMetric::Streak => (history.streaks(), (0.0, 0.0), " days"),
    };
    let points: Vec<Option<f64>> = values.iter().map(|v| v.map(|v| v as f64)).collect();
    let line = render_sparkline(&points, Some(domain));
    let months: Vec<MonthKey> = history.months.iter().map(|m| m.month).collect();

    match format {
        OutputFormat::Json => to_json(&json!({
            "metric": metric,
            "months": months,
            "values": values,
            "sparkline": line
        })),
        OutputFormat::Pretty => {
            let mut output = vec![format!("{}", metric_label(metric).bold())];
            if let (Some(first), Some(last)) = (months.first(), months.last()) {
                output.push(format!("  {first} .. {last}"));
            }
            output.push(format!("  {line}"));
            let latest = values.iter().rev().flatten().next();
            output.push(match latest {
                Some(v) => format!("  Latest: {v}{unit}"),
                None => "  No summaries in this window yet".dimmed().to_string(),
            });
            Ok(output.join("\n"))
        }
    }
}
