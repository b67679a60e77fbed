//! Storage layer for taskpulse.
//!
//! This module provides SQLite-based persistence for:
//! - Tasks (see [`crate::tasks::TaskStorage`])
//! - Monthly summaries (see [`crate::features::stats::SummaryStorage`])

mod database;
mod migrations;

pub use database::Database;
