//! Feature implementations for taskpulse.
//!
//! - Statistics: accuracy, streaks, monthly summaries, trends and charts

pub mod stats;
