//! Core abstractions for taskpulse.
//!
//! This module provides calendar-month arithmetic and the collaborator traits
//! shared across features.

pub mod month;
mod traits;

pub use month::{date_from_epoch_day, day_of, epoch_day, MonthKey};
pub use traits::{SummaryStore, TaskSource};

#[cfg(test)]
pub use traits::{MockSummaryStore, MockTaskSource};
