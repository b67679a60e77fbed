//! Error types for taskpulse.

use thiserror::Error;

/// Main error type for the taskpulse library.
#[derive(Error, Debug)]
pub enum PulseError {
    /// `SQLite` failure, with the operation that failed.
    #[error("database error: {0}")]
    Database(String),

    /// Configuration could not be read, parsed, or written.
    #[error("config error: {0}")]
    Config(String),

    /// Serialization or value parsing failed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A task or summary that was asked for does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// User input that is well-formed but unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PulseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<rusqlite::Error> for PulseError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Result type alias for taskpulse.
pub type Result<T> = std::result::Result<T, PulseError>;
