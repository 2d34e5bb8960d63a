//! Error types for habitrack-core

use thiserror::Error;

/// Main error type for the habitrack-core library
///
/// Analytics never fail. Errors only come from the data boundary:
/// snapshot parsing, settings validation and journal operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Clock string that is not a valid "HH:MM"
    #[error("invalid clock time: {0:?}")]
    InvalidClockTime(String),

    /// Log entry with out-of-range fields
    #[error("invalid log entry: {0}")]
    InvalidEntry(String),

    /// Log entry not found
    #[error("log entry not found: {0}")]
    EntryNotFound(String),

    /// Drink already finished
    #[error("drink already completed: {0}")]
    AlreadyCompleted(String),
}

/// Result type alias for habitrack-core
pub type Result<T> = std::result::Result<T, Error>;
