//! Estimation accuracy.
//!
//! Scores how close each completed task's estimate came to its actual
//! duration, then aggregates the scores for a period.

use serde::{Deserialize, Serialize};

use super::metrics::average_minutes;
use super::trends::TrendIndicator;
use crate::tasks::Task;

/// Share of the actual duration an estimate may miss by and still count as accurate.
const TOLERANCE_RATIO: f64 = 0.10;

/// Minimum tolerance in minutes.
const MIN_TOLERANCE_MINUTES: i64 = 1;

/// How an estimate compared to the actual duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateCategory {
    /// Within the tolerance band
    Accurate,
    /// Estimated longer than it took
    Overestimate,
    /// Estimated shorter than it took
    Underestimate,
}

impl std::fmt::Display for EstimateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accurate => write!(f, "accurate"),
            Self::Overestimate => write!(f, "overestimate"),
            Self::Underestimate => write!(f, "underestimate"),
        }
    }
}

/// Score for a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAccuracy {
    /// 0-100, 100 meaning the estimate was exact
    pub accuracy: i64,
    pub category: EstimateCategory,
}

impl TaskAccuracy {
    /// Score an estimate against the actual duration, both in minutes.
    ///
    /// Callers only pass positive values; see [`AccuracyStats::calculate`].
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn score(estimated: i64, actual: i64) -> Self {
        let diff = (estimated - actual).abs();
        let larger = estimated.max(actual).max(1);
        let accuracy = (100.0 - diff as f64 / larger as f64 * 100.0).round().max(0.0) as i64;

        let tolerance = ((actual as f64 * TOLERANCE_RATIO).round() as i64).max(MIN_TOLERANCE_MINUTES);
        let category = if diff <= tolerance {
            EstimateCategory::Accurate
        } else if estimated > actual {
            EstimateCategory::Overestimate
        } else {
            EstimateCategory::Underestimate
        };

        Self { accuracy, category }
    }

    /// Score a task if it qualifies: completed, with positive estimate and actual.
    #[must_use]
    pub fn for_task(task: &Task) -> Option<Self> {
        if !task.is_completed {
            return None;
        }
        match (task.estimated_minutes, task.actual_minutes) {
            (Some(estimated), Some(actual)) if estimated > 0 && actual > 0 => {
                Some(Self::score(estimated, actual))
            }
            _ => None,
        }
    }
}

/// Aggregate accuracy over a period's tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyStats {
    /// Mean per-task accuracy; `None` when no task qualified
    pub accuracy: Option<i64>,
    /// Completed tasks in the input, qualifying or not
    pub total_completed: usize,
    /// Tasks with a usable estimate and actual duration
    pub tasks_analyzed: usize,
    pub accurate_count: usize,
    pub overestimated_count: usize,
    pub underestimated_count: usize,
    pub avg_estimated_minutes: Option<i64>,
    pub avg_actual_minutes: Option<i64>,
    /// Change against a prior period, when both periods have a score
    pub trend: Option<TrendIndicator>,
}

impl AccuracyStats {
    /// Aggregate the tasks of one period.
    ///
    /// A period with no qualifying tasks is not an error: accuracy and both
    /// averages are `None` and all counts are zero.
    #[must_use]
    pub fn calculate(tasks: &[Task]) -> Self {
        let mut stats = Self {
            total_completed: tasks.iter().filter(|t| t.is_completed).count(),
            ..Self::default()
        };

        let mut scores = Vec::new();
        let mut estimates = Vec::new();
        let mut actuals = Vec::new();

        for task in tasks {
            let Some(scored) = TaskAccuracy::for_task(task) else {
                continue;
            };
            match scored.category {
                EstimateCategory::Accurate => stats.accurate_count += 1,
                EstimateCategory::Overestimate => stats.overestimated_count += 1,
                EstimateCategory::Underestimate => stats.underestimated_count += 1,
            }
            scores.push(scored.accuracy);
            estimates.extend(task.estimated_minutes);
            actuals.extend(task.actual_minutes);
        }

        stats.tasks_analyzed = scores.len();
        stats.accuracy = average_minutes(scores);
        stats.avg_estimated_minutes = average_minutes(estimates);
        stats.avg_actual_minutes = average_minutes(actuals);
        stats
    }

    /// Aggregate `current` and compare it with `previous`.
    ///
    /// No trend is reported unless both periods have an accuracy score.
    #[must_use]
    pub fn calculate_with_trend(current: &[Task], previous: &[Task]) -> Self {
        let mut stats = Self::calculate(current);
        let prior = Self::calculate(previous);

        stats.trend = match (stats.accuracy, prior.accuracy) {
            (Some(now), Some(before)) => Some(TrendIndicator::compare(now, before)),
            _ => None,
        };
        stats
    }

    /// The miss direction that strictly outnumbers both other categories.
    #[must_use]
    pub const fn dominant_bias(&self) -> Option<EstimateCategory> {
        let over = self.overestimated_count;
        let under = self.underestimated_count;
        let accurate = self.accurate_count;

        if over > under && over > accurate {
            Some(EstimateCategory::Overestimate)
        } else if under > over && under > accurate {
            Some(EstimateCategory::Underestimate)
        } else {
            None
        }
    }
}
