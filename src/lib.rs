//! taskpulse - a personal task tracker with productivity analytics
//!
//! Tasks live in a local `SQLite` database. On top of them this crate computes
//! estimation accuracy, completion streaks, the most productive weekday,
//! persisted monthly summaries, month-over-month trends and text charts.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tasks;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use core::MonthKey;
pub use error::PulseError;
pub use storage::Database;
