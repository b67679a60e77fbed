//! Path resolution for taskpulse configuration and data files.
//!
//! All taskpulse data is stored in `~/.taskpulse/`, or in `$TASKPULSE_HOME`
//! when that is set:
//! - `config.yaml` - Main configuration file
//! - `taskpulse.db` - SQLite database for tasks and monthly summaries

use std::path::PathBuf;

use crate::error::PulseError;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "TASKPULSE_HOME";

/// Paths to taskpulse configuration and data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Root directory: `~/.taskpulse/`
    pub root: PathBuf,
    /// Config file: `~/.taskpulse/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.taskpulse/taskpulse.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `$TASKPULSE_HOME`, falling back to `$HOME/.taskpulse`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, PulseError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            PulseError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".taskpulse")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("taskpulse.db"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), PulseError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                PulseError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}
