//! Monthly summaries.
//!
//! Pulls one month's tasks from a [`TaskSource`], runs the calculators over
//! them, and upserts the result through a [`SummaryStore`].
//!
//! Generation is read, compute, then write. The write is a single upsert, but
//! two concurrent generations of the same month are last-writer-wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::accuracy::AccuracyStats;
use super::celebration::{celebration_message_with_tone, Tone};
use super::metrics::{average_minutes, longest_streak, percentage, ProductiveDay};
use crate::core::{MonthKey, SummaryStore, TaskSource};
use crate::error::Result;
use crate::tasks::{Task, TaskFilter};

/// A computed summary that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDraft {
    pub month: MonthKey,
    /// Tasks created in the month
    pub total_tasks: i64,
    /// Of those, how many are completed
    pub completed_tasks: i64,
    /// 0-100
    pub completion_rate: i64,
    /// Mean actual minutes of completed tasks with a known duration
    pub avg_duration_minutes: Option<i64>,
    /// 0-100, `None` when no task had a usable estimate
    pub estimation_accuracy: Option<i64>,
    /// Longest run of consecutive completion days
    pub longest_streak: i64,
    pub most_productive_day: Option<String>,
    pub celebration_message: String,
}

impl SummaryDraft {
    /// Compute a month's summary from the tasks created in it.
    #[must_use]
    pub fn from_tasks(month: MonthKey, tasks: &[Task], tone: Tone) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.is_completed).count();
        let completion_rate = percentage(completed, total);

        let avg_duration_minutes = average_minutes(
            tasks
                .iter()
                .filter(|t| t.is_completed)
                .filter_map(|t| t.actual_minutes),
        );
        let estimation_accuracy = AccuracyStats::calculate(tasks).accuracy;
        let longest_streak = to_i64(longest_streak(tasks));
        let most_productive_day = ProductiveDay::calculate(tasks).day;

        let completed = to_i64(completed);
        Self {
            month,
            total_tasks: to_i64(total),
            completed_tasks: completed,
            completion_rate,
            avg_duration_minutes,
            estimation_accuracy,
            longest_streak,
            most_productive_day,
            celebration_message: celebration_message_with_tone(
                completion_rate,
                completed,
                longest_streak,
                tone,
            ),
        }
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// A persisted monthly summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub id: i64,
    pub month: MonthKey,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub completion_rate: i64,
    pub avg_duration_minutes: Option<i64>,
    pub estimation_accuracy: Option<i64>,
    pub longest_streak: i64,
    pub most_productive_day: Option<String>,
    pub celebration_message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonthlySummary {
    /// The metric fields, without identity or timestamps.
    #[cfg(test)]
    pub(crate) fn draft(&self) -> SummaryDraft {
        SummaryDraft {
            month: self.month,
            total_tasks: self.total_tasks,
            completed_tasks: self.completed_tasks,
            completion_rate: self.completion_rate,
            avg_duration_minutes: self.avg_duration_minutes,
            estimation_accuracy: self.estimation_accuracy,
            longest_streak: self.longest_streak,
            most_productive_day: self.most_productive_day.clone(),
            celebration_message: self.celebration_message.clone(),
        }
    }
}

/// Generates and persists monthly summaries.
pub struct SummaryGenerator<'a, T: TaskSource, S: SummaryStore> {
    tasks: &'a T,
    store: &'a S,
    tone: Tone,
}

impl<'a, T: TaskSource, S: SummaryStore> SummaryGenerator<'a, T, S> {
    #[must_use]
    pub fn new(tasks: &'a T, store: &'a S) -> Self {
        Self {
            tasks,
            store,
            tone: Tone::default(),
        }
    }

    /// Use `tone` for the celebration message.
    #[must_use]
    pub const fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Compute the summary for `month` without storing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the task source cannot be read.
    pub fn preview(&self, month: MonthKey) -> Result<SummaryDraft> {
        let tasks = self.tasks.find_tasks(&TaskFilter::created_in(month))?;
        tracing::debug!(%month, tasks = tasks.len(), "Fetched tasks for summary");
        Ok(SummaryDraft::from_tasks(month, &tasks, self.tone))
    }

    /// Compute and upsert the summary for `month`.
    ///
    /// # Errors
    ///
    /// Errors from the task source or the store are returned unchanged.
    pub fn generate(&self, month: MonthKey) -> Result<MonthlySummary> {
        let draft = self.preview(month)?;
        let saved = self.store.save(&draft)?;

        tracing::info!(
            %month,
            id = saved.id,
            total = saved.total_tasks,
            completed = saved.completed_tasks,
            completion_rate = saved.completion_rate,
            "Saved monthly summary"
        );
        Ok(saved)
    }
}
