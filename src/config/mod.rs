//! Configuration management for taskpulse.
//!
//! This module handles loading and saving configuration from `~/.taskpulse/`
//! (or `$TASKPULSE_HOME`).

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{ColorSetting, Config, GeneralConfig, LoggingConfig, StatsConfig};
