//! CLI error types.

use thiserror::Error;

use volscope_analytics::FailureKind;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Input file content could not be used.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The analysis produced no result for the ticker.
    #[error("{ticker}: volatility analysis unavailable ({kind}): {message}")]
    Unavailable {
        /// Ticker analyzed.
        ticker: String,
        /// Failure code.
        kind: FailureKind,
        /// Failure description.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
