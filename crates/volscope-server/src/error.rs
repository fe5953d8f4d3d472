//! Server errors.

use thiserror::Error;

use volscope_analytics::AnalyticsError;

/// Errors raised while configuring or starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::ServerConfig`].
    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    /// The analysis parameters are out of range.
    #[error("invalid analysis config: {0}")]
    InvalidConfig(#[from] AnalyticsError),

    /// The configured host is not an IP address.
    #[error("invalid host {host:?}: {source}")]
    InvalidHost {
        /// Configured host.
        host: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },

    /// The listener could not be bound or the server stopped with an error.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for server setup.
pub type ServerResult<T> = Result<T, ServerError>;
