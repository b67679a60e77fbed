//! Terminal visualization for statistics.
//!
//! Weekly completion charts, sparklines, and the small bar and box helpers
//! the pretty printer builds on. Every renderer returns a plain `String`.

use chrono::Datelike;

use super::metrics::{percentage, WEEKDAY_NAMES};
use crate::core::{date_from_epoch_day, day_of, epoch_day, MonthKey};
use crate::tasks::Task;

/// Sparkline levels, lowest first.
const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_PLACEHOLDER: char = '·';
const FULL_BLOCK: char = '█';
const EMPTY_BLOCK: char = '░';

/// Width of the weekly chart bars.
const WEEK_BAR_WIDTH: usize = 20;
/// Width the `Week N (a-b)` label is padded to.
const WEEK_LABEL_WIDTH: usize = 20;

/// Default sparkline domain for percentage series.
pub const PERCENT_DOMAIN: (f64, f64) = (0.0, 100.0);

/// `width` cells, the completed share filled and rounded to the nearest cell.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn proportional_bar(part: usize, whole: usize, width: usize) -> String {
    let filled = if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * width as f64).round() as usize
    }
    .min(width);

    let mut bar = FULL_BLOCK.to_string().repeat(filled);
    bar.push_str(&EMPTY_BLOCK.to_string().repeat(width - filled));
    bar
}

struct WeekBucket {
    first: i64,
    last: i64,
    completed: usize,
    total: usize,
}

/// Render the weekly completion chart for `month`.
///
/// Weeks start on Monday; the first and last week are clipped to the month.
/// Tasks are bucketed by the UTC day they were created, and tasks created
/// outside `month` are ignored.
#[must_use]
pub fn render_weekly_chart(tasks: &[Task], month: MonthKey) -> String {
    let first = epoch_day(month.first_day());
    let last = epoch_day(month.last_day());
    let monday = first - i64::from(month.first_day().weekday().num_days_from_monday());

    let mut weeks: Vec<WeekBucket> = Vec::new();
    let mut start = monday;
    while start <= last {
        weeks.push(WeekBucket {
            first: start.max(first),
            last: (start + 6).min(last),
            completed: 0,
            total: 0,
        });
        start += 7;
    }

    let mut total = 0;
    let mut completed = 0;
    for task in tasks {
        if !month.contains(task.created_at) {
            continue;
        }
        let day = day_of(task.created_at);
        let Ok(index) = usize::try_from((day - monday) / 7) else {
            continue;
        };
        if let Some(week) = weeks.get_mut(index) {
            week.total += 1;
            total += 1;
            if task.is_completed {
                week.completed += 1;
                completed += 1;
            }
        }
    }

    if total == 0 {
        return format!("No tasks recorded for {month}.");
    }

    let day_of_month = |day: i64| date_from_epoch_day(day).map_or(0, |d| d.day());

    let mut lines = Vec::with_capacity(weeks.len() + 3);
    for (n, week) in weeks.iter().enumerate() {
        let label = format!(
            "Week {} ({}-{})",
            n + 1,
            day_of_month(week.first),
            day_of_month(week.last)
        );
        lines.push(format!(
            "{label:<width$} {} {}/{} tasks ({}%)",
            proportional_bar(week.completed, week.total, WEEK_BAR_WIDTH),
            week.completed,
            week.total,
            percentage(week.completed, week.total),
            width = WEEK_LABEL_WIDTH,
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Legend: {} = completed, {} = pending",
        FULL_BLOCK, EMPTY_BLOCK
    ));
    lines.push(format!(
        "Total: {completed}/{total} tasks completed ({}%)",
        percentage(completed, total)
    ));

    lines.join("\n")
}

/// Render a sparkline (compact inline chart).
///
/// The effective range is `domain` (default `0..=100`) widened to cover every
/// value present. `None` entries render as a placeholder, so the output has
/// exactly one glyph per input value.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn render_sparkline(values: &[Option<f64>], domain: Option<(f64, f64)>) -> String {
    let (mut min, mut max) = domain.unwrap_or(PERCENT_DOMAIN);
    for v in values.iter().flatten() {
        min = min.min(*v);
        max = max.max(*v);
    }
    let span = max - min;
    let top = (SPARK_CHARS.len() - 1) as f64;

    values
        .iter()
        .map(|value| match value {
            None => SPARK_PLACEHOLDER,
            Some(_) if span <= 0.0 => SPARK_CHARS[0],
            Some(v) => {
                let level = ((v - min) / span * top).round().clamp(0.0, top) as usize;
                SPARK_CHARS[level]
            }
        })
        .collect()
}

/// Render a horizontal bar chart.
///
/// # Arguments
///
/// * `data` - (label, value) pairs
/// * `max_label_width` - Width labels are padded or truncated to
/// * `bar_width` - Width of the longest bar
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn render_bar_chart(data: &[(String, usize)], max_label_width: usize, bar_width: usize) -> String {
    if data.is_empty() {
        return String::new();
    }

    let max_value = data.iter().map(|(_, v)| *v).max().unwrap_or(1).max(1);
    let mut lines = Vec::with_capacity(data.len());

    for (label, value) in data {
        let label: String = if label.chars().count() > max_label_width {
            label.chars().take(max_label_width).collect()
        } else {
            format!("{label:max_label_width$}")
        };

        let bar_length = ((*value as f64 / max_value as f64) * bar_width as f64).round() as usize;
        let bar = FULL_BLOCK.to_string().repeat(bar_length);
        let padding = " ".repeat(bar_width.saturating_sub(bar_length));

        lines.push(format!("{label} |{bar}{padding} {value}"));
    }

    lines.join("\n")
}

/// Completions per weekday, Sunday first.
#[must_use]
pub fn render_weekday_chart(counts: &[usize; 7]) -> String {
    let data: Vec<(String, usize)> = WEEKDAY_NAMES
        .iter()
        .zip(counts.iter())
        .map(|(name, &count)| ((*name).to_string(), count))
        .collect();

    render_bar_chart(&data, 9, WEEK_BAR_WIDTH)
}

/// A `[████░░░░]` bar for a 0-100 rate.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn render_progress_bar(rate: i64, width: usize) -> String {
    let rate = rate.clamp(0, 100) as usize;
    format!("[{}] {rate}%", proportional_bar(rate, 100, width))
}

/// Render a box with a title and aligned `label : value` rows.
#[must_use]
pub fn render_summary_box(title: &str, items: &[(&str, String)]) -> String {
    let width_of = |s: &str| s.chars().count();

    let label_width = items.iter().map(|(l, _)| width_of(l)).max().unwrap_or(0);
    let value_width = items.iter().map(|(_, v)| width_of(v)).max().unwrap_or(0);
    let box_width = (label_width + value_width + 3).max(width_of(title)) + 4;

    let mut lines = Vec::with_capacity(items.len() + 4);
    lines.push(format!("┌{}┐", "─".repeat(box_width)));

    let left = (box_width - width_of(title)) / 2;
    let right = box_width - left - width_of(title);
    lines.push(format!("│{}{title}{}│", " ".repeat(left), " ".repeat(right)));
    lines.push(format!("├{}┤", "─".repeat(box_width)));

    for (label, value) in items {
        let row = format!("{label:>label_width$} : {value}");
        let padding = box_width.saturating_sub(width_of(&row) + 2);
        lines.push(format!("│ {row}{} │", " ".repeat(padding)));
    }

    lines.push(format!("└{}┘", "─".repeat(box_width)));
    lines.join("\n")
}
