use colored::Colorize;

use crate::features::stats::{
    render_progress_bar, render_summary_box, render_weekday_chart, AccuracyStats,
    HistoricalTrends, MonthComparison, MonthlySummary, ProductiveDay, StreakInfo, TrendDirection,
    TrendIndicator,
};
use crate::core::MonthKey;
use crate::tasks::Task;

fn status_icon(task: &Task) -> colored::ColoredString {
    if task.is_completed {
        "[x]".green()
    } else {
        "[ ]".white()
    }
}

fn colored_trend(trend: &TrendIndicator) -> String {
    let label = trend.label();
    match trend.direction {
        TrendDirection::Up => label.green().to_string(),
        TrendDirection::Down => label.red().to_string(),
        TrendDirection::Stable => label.dimmed().to_string(),
    }
}

fn or_dash(value: Option<i64>, unit: &str) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}{unit}"))
}

/// Format a list of tasks as a pretty table
pub fn format_tasks_pretty(tasks: &[Task], title: &str) -> String {
    if tasks.is_empty() {
        return format!("{title} (0 items)\n  No items");
    }

    let mut output = format!("{} ({} items)\n", title, tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let mut line = format!(
            "{} {} {}",
            status_icon(task),
            format!("#{}", task.id).dimmed(),
            task.title.bold()
        );

        if let Some(estimate) = task.estimated_minutes {
            line.push_str(&format!("  {}", format!("~{estimate}m").yellow()));
        }

        if let Some(actual) = task.actual_minutes {
            line.push_str(&format!("  {}", format!("{actual}m").green()));
        }

        if !task.tags.is_empty() {
            let tags_str = task
                .tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" ");
            line.push_str(&format!("  {}", tags_str.cyan()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single task as pretty output
pub fn format_task_pretty(task: &Task) -> String {
    let mut output = format!("{} {}\n", status_icon(task), task.title.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), task.id));

    if let Some(description) = &task.description {
        output.push_str(&format!("  {}: {}\n", "Description".dimmed(), description));
    }

    output.push_str(&format!(
        "  {}: {}\n",
        "Created".dimmed(),
        task.created_at.format("%Y-%m-%d %H:%M")
    ));

    if let Some(completed) = task.completion() {
        output.push_str(&format!(
            "  {}: {}\n",
            "Completed".dimmed(),
            completed.format("%Y-%m-%d %H:%M")
        ));
    }

    if let Some(estimate) = task.estimated_minutes {
        output.push_str(&format!("  {}: {} min\n", "Estimate".dimmed(), estimate));
    }

    if let Some(actual) = task.actual_minutes {
        output.push_str(&format!("  {}: {} min\n", "Actual".dimmed(), actual));
    }

    if !task.tags.is_empty() {
        output.push_str(&format!("  {}: {}\n", "Tags".dimmed(), task.tags.join(", ")));
    }

    output
}

/// Format a monthly summary as a boxed panel plus its message
pub fn format_summary_pretty(summary: &MonthlySummary) -> String {
    let items = [
        (
            "Tasks",
            format!("{}/{} completed", summary.completed_tasks, summary.total_tasks),
        ),
        ("Completion", render_progress_bar(summary.completion_rate, 20)),
        ("Avg duration", or_dash(summary.avg_duration_minutes, " min")),
        ("Accuracy", or_dash(summary.estimation_accuracy, "%")),
        ("Longest streak", format!("{} days", summary.longest_streak)),
        (
            "Best day",
            summary
                .most_productive_day
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        ),
    ];

    let mut output = render_summary_box(&format!("Summary {}", summary.month), &items);
    output.push('\n');
    output.push_str(&summary.celebration_message);
    output.push('\n');
    output
}

/// Format stored summaries, one line per month
pub fn format_summaries_pretty(summaries: &[MonthlySummary]) -> String {
    if summaries.is_empty() {
        return "Summaries (0)\n  No summaries yet. Run `taskpulse summary generate`.".to_string();
    }

    let mut output = format!("Summaries ({})\n", summaries.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for s in summaries {
        output.push_str(&format!(
            "{}  {:>3}%  {:>3}/{:<3} tasks  accuracy {:>4}  streak {}\n",
            s.month.to_string().bold(),
            s.completion_rate,
            s.completed_tasks,
            s.total_tasks,
            or_dash(s.estimation_accuracy, "%"),
            s.longest_streak
        ));
    }

    output
}

/// Format a month's estimation accuracy
pub fn format_accuracy_pretty(month: MonthKey, stats: &AccuracyStats, insight: Option<&str>) -> String {
    let mut output = format!("{} {}\n", "Estimation accuracy".bold(), month);
    output.push_str(&"─".repeat(50));
    output.push('\n');

    let Some(accuracy) = stats.accuracy else {
        output.push_str(&format!(
            "  No completed tasks with both an estimate and a duration ({} completed).\n",
            stats.total_completed
        ));
        return output;
    };

    let mut headline = format!("  Accuracy: {}", format!("{accuracy}%").cyan());
    if let Some(trend) = &stats.trend {
        headline.push_str(&format!("  {}", colored_trend(trend)));
    }
    output.push_str(&headline);
    output.push('\n');

    output.push_str(&format!(
        "  Analyzed: {} of {} completed\n",
        stats.tasks_analyzed, stats.total_completed
    ));
    output.push_str(&format!(
        "  Accurate: {}  Over: {}  Under: {}\n",
        stats.accurate_count.to_string().green(),
        stats.overestimated_count.to_string().yellow(),
        stats.underestimated_count.to_string().red()
    ));
    output.push_str(&format!(
        "  Avg estimate: {}  Avg actual: {}\n",
        or_dash(stats.avg_estimated_minutes, " min"),
        or_dash(stats.avg_actual_minutes, " min")
    ));

    if let Some(insight) = insight {
        output.push('\n');
        output.push_str(insight);
        output.push('\n');
    }

    output
}

/// Format streak information
pub fn format_streak_pretty(streak: &StreakInfo) -> String {
    let current = if streak.current > 0 {
        format!("{} days", streak.current).green().to_string()
    } else {
        "0 days".dimmed().to_string()
    };

    let mut output = format!("{}\n", "🔥 STREAK".bold());
    output.push_str(&"─".repeat(50));
    output.push('\n');
    output.push_str(&format!(
        "  Current: {}  Longest: {} days\n",
        current, streak.longest
    ));

    match streak.last_completion {
        Some(last) => {
            output.push_str(&format!("  Last completion: {last}\n"));
            if streak.days_since_completion > 0 {
                output.push_str(&format!(
                    "  Days since last completion: {}\n",
                    streak.days_since_completion
                ));
            }
        }
        None => output.push_str("  No completions yet\n"),
    }

    output
}

/// Format the weekday distribution of a month
pub fn format_productive_day_pretty(month: MonthKey, day: &ProductiveDay) -> String {
    let mut output = format!("{} {}\n", "Completions by weekday".bold(), month);
    output.push_str(&"─".repeat(50));
    output.push('\n');

    match &day.day {
        Some(name) => {
            output.push_str(&render_weekday_chart(&day.by_weekday));
            output.push_str(&format!(
                "\n\n  Most productive day: {} ({} completed)\n",
                name.cyan(),
                day.count
            ));
        }
        None => output.push_str("  No completions this month\n"),
    }

    output
}

/// Format a month-over-month comparison
pub fn format_comparison_pretty(comparison: &MonthComparison) -> String {
    let mut output = format!(
        "{} {} vs {}\n",
        "Comparison".bold(),
        comparison.month,
        comparison.previous_month
    );
    output.push_str(&"─".repeat(50));
    output.push('\n');
    output.push_str(&format!(
        "  Completion rate: {:+}pts  {}\n",
        comparison.completion_rate_delta,
        colored_trend(&comparison.completion_rate)
    ));
    match &comparison.accuracy {
        Some(trend) => output.push_str(&format!("  Accuracy: {}\n", colored_trend(trend))),
        None => output.push_str("  Accuracy: -\n"),
    }
    output
}

/// Format a historical trend window
pub fn format_history_pretty(history: &HistoricalTrends) -> String {
    let mut output = format!("{}\n", "Trends".bold());
    output.push_str(&"─".repeat(50));
    output.push('\n');

    for entry in &history.months {
        let line = match &entry.summary {
            Some(s) => format!(
                "  {}  {:>3}%  accuracy {:>4}  streak {:>2}  {}",
                entry.month,
                s.completion_rate,
                or_dash(s.estimation_accuracy, "%"),
                s.longest_streak,
                entry.trend.as_ref().map(colored_trend).unwrap_or_default()
            ),
            None => format!("  {}  {}", entry.month, "no summary".dimmed()),
        };
        output.push_str(line.trim_end());
        output.push('\n');
    }

    let verdict = |improving: bool| {
        if improving {
            "improving".green().to_string()
        } else {
            "not improving".dimmed().to_string()
        }
    };
    output.push('\n');
    output.push_str(&format!(
        "  Completion rate: {}\n  Accuracy: {}\n",
        verdict(history.completion_rate_improving),
        verdict(history.accuracy_improving)
    ));

    output
}
