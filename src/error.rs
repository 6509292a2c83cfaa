//! Error types for the logger and its static facade

use thiserror::Error;

/// Errors that can occur while constructing, writing to or tearing down a logger
#[derive(Debug, Error)]
pub enum Error {
    /// IO operation failed
    #[error("{0}: {1}")]
    Io(&'static str, #[source] std::io::Error),

    /// Output method name or code that does not map to a known renderer
    #[error("unknown output method: {0}")]
    UnknownOutputMethod(String),

    /// Date format string that chrono cannot render
    #[error("invalid date format: {0:?}")]
    InvalidDateFormat(String),

    /// The logger has been destroyed and its file handle released
    #[error("logger has already been destroyed")]
    Closed,

    /// A static facade function was called before `setup`
    #[error("static logger used before setup")]
    NotInitialized,

    /// Options document could not be parsed
    #[error("invalid logger options: {0}")]
    Options(#[from] toml::de::Error),

    /// Value could not be converted for logging
    #[error("failed to convert value: {0}")]
    Convert(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an IO error with a short description of what was being attempted
    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |e| Self::Io(context, e)
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
