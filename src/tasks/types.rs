use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::MonthKey;

/// A task record as owned by the tracker.
///
/// `actual_minutes` is only ever set on a completed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_minutes: Option<i64>,
    #[serde(default)]
    pub actual_minutes: Option<i64>,
    pub is_completed: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    /// Completion timestamp, only for tasks that are actually completed.
    #[must_use]
    pub fn completion(&self) -> Option<DateTime<Utc>> {
        if self.is_completed {
            self.completed_at
        } else {
            None
        }
    }
}

/// A task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub estimated_minutes: Option<i64>,
    pub tags: Vec<String>,
    /// Creation time; `None` means "now" at insert time.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewTask {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            estimated_minutes: None,
            tags: Vec::new(),
            created_at: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn with_estimate(mut self, minutes: i64) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Backdate the task, e.g. when importing history.
    #[must_use]
    pub const fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

/// Query against the task source.
///
/// `*_after` bounds are inclusive and `*_before` bounds are exclusive, so a
/// month's [`MonthKey::range`] plugs in directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub completed_after: Option<DateTime<Utc>>,
    pub completed_before: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
}

impl TaskFilter {
    /// Tasks created within `month`.
    #[must_use]
    pub fn created_in(month: MonthKey) -> Self {
        let (start, end) = month.range();
        Self {
            created_after: Some(start),
            created_before: Some(end),
            ..Self::default()
        }
    }

    /// Tasks completed within `month`.
    #[must_use]
    pub fn completed_in(month: MonthKey) -> Self {
        let (start, end) = month.range();
        Self {
            completed_after: Some(start),
            completed_before: Some(end),
            is_completed: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = Some(is_completed);
        self
    }

    /// In-memory evaluation of the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self.created_after.is_some_and(|t| task.created_at < t) {
            return false;
        }
        if self.created_before.is_some_and(|t| task.created_at >= t) {
            return false;
        }
        if self.completed_after.is_some() || self.completed_before.is_some() {
            let Some(done) = task.completed_at else {
                return false;
            };
            if self.completed_after.is_some_and(|t| done < t) {
                return false;
            }
            if self.completed_before.is_some_and(|t| done >= t) {
                return false;
            }
        }
        self.is_completed.map_or(true, |want| task.is_completed == want)
    }
}
