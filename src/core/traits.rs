//! Collaborator seams for the analytics engine.
//!
//! The engine never reaches for a shared connection. Callers hand it a task
//! source and a summary store, which in the application are both backed by
//! the same [`crate::storage::Database`].

#[cfg(test)]
use mockall::automock;

use crate::core::MonthKey;
use crate::error::Result;
use crate::features::stats::{MonthlySummary, SummaryDraft};
use crate::tasks::{Task, TaskFilter};

/// Read access to task records.
#[cfg_attr(test, automock)]
pub trait TaskSource {
    /// Tasks matching `filter`, ordered by creation time then id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried.
    fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;
}

/// Persistence for monthly summaries, one record per month.
#[cfg_attr(test, automock)]
pub trait SummaryStore {
    /// Create or replace the summary for `draft.month`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&self, draft: &SummaryDraft) -> Result<MonthlySummary>;

    /// Summary for a month, if one has been generated.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried.
    fn find_by_month(&self, month: MonthKey) -> Result<Option<MonthlySummary>>;

    /// Stored summaries, most recent month first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried.
    fn find_all(&self, limit: Option<usize>) -> Result<Vec<MonthlySummary>>;
}
