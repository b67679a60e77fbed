//! Trend comparisons across persisted monthly summaries.

use serde::{Deserialize, Serialize};

use super::summary::MonthlySummary;
use crate::core::{MonthKey, SummaryStore};
use crate::error::Result;

/// Changes smaller than this many percentage points count as stable.
pub const STABILITY_THRESHOLD: i64 = 5;

/// Direction of a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    /// Arrow glyph for terminal output.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Stable => "→",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// Direction plus magnitude (absolute percentage points) of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendIndicator {
    pub direction: TrendDirection,
    pub change: i64,
}

impl TrendIndicator {
    /// Classify `current` against `previous`.
    #[must_use]
    pub const fn compare(current: i64, previous: i64) -> Self {
        let change = (current - previous).abs();
        let direction = if change < STABILITY_THRESHOLD {
            TrendDirection::Stable
        } else if current > previous {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        };
        Self { direction, change }
    }

    /// Short form such as `↑ 12pts`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}pts", self.direction.arrow(), self.change)
    }
}

/// One month compared against an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthComparison {
    pub month: MonthKey,
    pub previous_month: MonthKey,
    /// Signed completion-rate change in percentage points
    pub completion_rate_delta: i64,
    pub completion_rate: TrendIndicator,
    /// Present only when both months have an accuracy score
    pub accuracy: Option<TrendIndicator>,
}

/// One month in a historical window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTrend {
    pub month: MonthKey,
    pub summary: Option<MonthlySummary>,
    /// Completion-rate change against the month before; never set on the earliest month
    pub trend: Option<TrendIndicator>,
}

/// A window of months ending at a given month, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalTrends {
    pub months: Vec<MonthTrend>,
    pub completion_rate_improving: bool,
    pub accuracy_improving: bool,
}

impl HistoricalTrends {
    /// Completion rates in window order, `None` for months without a summary.
    #[must_use]
    pub fn completion_rates(&self) -> Vec<Option<i64>> {
        self.months
            .iter()
            .map(|m| m.summary.as_ref().map(|s| s.completion_rate))
            .collect()
    }

    /// Accuracy scores in window order.
    #[must_use]
    pub fn accuracies(&self) -> Vec<Option<i64>> {
        self.months
            .iter()
            .map(|m| m.summary.as_ref().and_then(|s| s.estimation_accuracy))
            .collect()
    }

    /// Longest streaks in window order.
    #[must_use]
    pub fn streaks(&self) -> Vec<Option<i64>> {
        self.months
            .iter()
            .map(|m| m.summary.as_ref().map(|s| s.longest_streak))
            .collect()
    }
}

/// Whether the later half of `values` averages higher than the earlier half.
///
/// With an odd count the middle value joins the later half. Fewer than two
/// values never count as improving.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn is_improving(values: &[i64]) -> bool {
    if values.len() < 2 {
        return false;
    }
    let mean = |half: &[i64]| half.iter().sum::<i64>() as f64 / half.len() as f64;
    let (earlier, later) = values.split_at(values.len() / 2);
    mean(later) > mean(earlier)
}

/// Compares persisted summaries over time.
pub struct TrendAnalyzer<'a, S: SummaryStore> {
    store: &'a S,
}

impl<'a, S: SummaryStore> TrendAnalyzer<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Compare `month` with the month `offset` months before it.
    ///
    /// Returns `None` if either month has no stored summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn compare_months(&self, month: MonthKey, offset: u32) -> Result<Option<MonthComparison>> {
        let previous_month = month.offset(-i32::try_from(offset).unwrap_or(i32::MAX));

        let Some(current) = self.store.find_by_month(month)? else {
            tracing::debug!(%month, "No summary to compare");
            return Ok(None);
        };
        let Some(previous) = self.store.find_by_month(previous_month)? else {
            tracing::debug!(month = %previous_month, "No earlier summary to compare against");
            return Ok(None);
        };

        let accuracy = match (current.estimation_accuracy, previous.estimation_accuracy) {
            (Some(now), Some(before)) => Some(TrendIndicator::compare(now, before)),
            _ => None,
        };

        Ok(Some(MonthComparison {
            month,
            previous_month,
            completion_rate_delta: current.completion_rate - previous.completion_rate,
            completion_rate: TrendIndicator::compare(
                current.completion_rate,
                previous.completion_rate,
            ),
            accuracy,
        }))
    }

    /// Build the window of `months` months ending at `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn historical(&self, end: MonthKey, months: usize) -> Result<HistoricalTrends> {
        let keys = MonthKey::months_ending_at(end, months);

        let mut window: Vec<MonthTrend> = Vec::with_capacity(keys.len());
        for month in keys {
            let summary = self.store.find_by_month(month)?;
            let trend = window.last().and_then(|prev| {
                match (&summary, &prev.summary) {
                    (Some(now), Some(before)) => Some(TrendIndicator::compare(
                        now.completion_rate,
                        before.completion_rate,
                    )),
                    _ => None,
                }
            });
            window.push(MonthTrend {
                month,
                summary,
                trend,
            });
        }

        let mut history = HistoricalTrends {
            months: window,
            completion_rate_improving: false,
            accuracy_improving: false,
        };
        let rates: Vec<i64> = history.completion_rates().into_iter().flatten().collect();
        let accuracies: Vec<i64> = history.accuracies().into_iter().flatten().collect();
        history.completion_rate_improving = is_improving(&rates);
        history.accuracy_improving = is_improving(&accuracies);

        tracing::debug!(
            %end,
            months,
            available = rates.len(),
            completion_rate_improving = history.completion_rate_improving,
            accuracy_improving = history.accuracy_improving,
            "Built historical trends"
        );
        Ok(history)
    }
}
