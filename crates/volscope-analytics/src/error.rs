//! Error types for the analytics engine.
//!
//! The three "no qualifying data" conditions of the volatility analyzer are
//! separate variants: callers remediate them differently (wait for later
//! expirations, distrust the feed, or accept the ticker has a one-sided chain).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use volscope_core::CoreError;

/// Unified error type for all analytics operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    // ========== Volatility Analyzer ==========
    /// No contract is far enough from expiration.
    #[error("no options found with at least {min_dte} DTE for {ticker}")]
    NoQualifyingExpiration {
        /// Ticker being analyzed.
        ticker: String,
        /// Minimum days-to-expiration that was required.
        min_dte: i64,
    },

    /// The selected expiration bucket held no contracts.
    #[error("could not determine ATM strike for {ticker} at DTE {dte}")]
    NoAtmStrike {
        /// Ticker being analyzed.
        ticker: String,
        /// Days-to-expiration of the selected bucket.
        dte: i64,
    },

    /// The selected expiration bucket is one-sided.
    #[error("could not find both calls and puts for {ticker} at DTE {dte} ({calls} calls, {puts} puts)")]
    MissingCallsOrPuts {
        /// Ticker being analyzed.
        ticker: String,
        /// Days-to-expiration of the selected bucket.
        dte: i64,
        /// Number of calls in the bucket.
        calls: usize,
        /// Number of puts in the bucket.
        puts: usize,
    },

    // ========== Price History ==========
    /// Not enough bars or closes for the requested window.
    #[error("insufficient history: {required} observations required, {available} available")]
    InsufficientHistory {
        /// Observations the calculation needs.
        required: usize,
        /// Observations supplied.
        available: usize,
    },

    // ========== General ==========
    /// Invalid input parameter
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Machine-readable failure code, as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// See [`AnalyticsError::NoQualifyingExpiration`].
    NoQualifyingExpiration,
    /// See [`AnalyticsError::NoAtmStrike`].
    NoAtmStrike,
    /// See [`AnalyticsError::MissingCallsOrPuts`].
    MissingCallsOrPuts,
    /// See [`AnalyticsError::InsufficientHistory`].
    InsufficientHistory,
    /// See [`AnalyticsError::InvalidInput`].
    InvalidInput,
}

impl FailureKind {
    /// The snake_case wire code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NoQualifyingExpiration => "no_qualifying_expiration",
            FailureKind::NoAtmStrike => "no_atm_strike",
            FailureKind::MissingCallsOrPuts => "missing_calls_or_puts",
            FailureKind::InsufficientHistory => "insufficient_history",
            FailureKind::InvalidInput => "invalid_input",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AnalyticsError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// The wire code for this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            AnalyticsError::NoQualifyingExpiration { .. } => FailureKind::NoQualifyingExpiration,
            AnalyticsError::NoAtmStrike { .. } => FailureKind::NoAtmStrike,
            AnalyticsError::MissingCallsOrPuts { .. } => FailureKind::MissingCallsOrPuts,
            AnalyticsError::InsufficientHistory { .. } => FailureKind::InsufficientHistory,
            AnalyticsError::InvalidInput(_) => FailureKind::InvalidInput,
        }
    }

    /// True for outcomes caused by data that is absent rather than malformed.
    ///
    /// These are expected, non-retryable results; a report renders them as an
    /// unavailable section instead of failing.
    #[must_use]
    pub fn is_missing_data(&self) -> bool {
        !matches!(self, AnalyticsError::InvalidInput(_))
    }

    /// The ticker the error refers to, when it carries one.
    #[must_use]
    pub fn ticker(&self) -> Option<&str> {
        match self {
            AnalyticsError::NoQualifyingExpiration { ticker, .. }
            | AnalyticsError::NoAtmStrike { ticker, .. }
            | AnalyticsError::MissingCallsOrPuts { ticker, .. } => Some(ticker),
            _ => None,
        }
    }
}

impl From<CoreError> for AnalyticsError {
    fn from(err: CoreError) -> Self {
        AnalyticsError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::NoQualifyingExpiration {
            ticker: "AAPL".to_string(),
            min_dte: 25,
        };
        assert_eq!(err.to_string(), "no options found with at least 25 DTE for AAPL");

        let err = AnalyticsError::MissingCallsOrPuts {
            ticker: "AAPL".to_string(),
            dte: 31,
            calls: 4,
            puts: 0,
        };
        assert!(err.to_string().contains("DTE 31"));
        assert!(err.to_string().contains("0 puts"));
    }

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            AnalyticsError::NoQualifyingExpiration {
                ticker: "X".to_string(),
                min_dte: 25,
            },
            AnalyticsError::NoAtmStrike {
                ticker: "X".to_string(),
                dte: 30,
            },
            AnalyticsError::MissingCallsOrPuts {
                ticker: "X".to_string(),
                dte: 30,
                calls: 1,
                puts: 0,
            },
        ];
        let kinds: std::collections::HashSet<_> = errors.iter().map(AnalyticsError::kind).collect();
        assert_eq!(kinds.len(), 3);
        assert!(errors.iter().all(AnalyticsError::is_missing_data));
        assert!(errors.iter().all(|e| e.ticker() == Some("X")));
    }

    #[test]
    fn test_kind_wire_codes() {
        assert_eq!(
            serde_json::to_string(&FailureKind::MissingCallsOrPuts).unwrap(),
            "\"missing_calls_or_puts\""
        );
        assert_eq!(FailureKind::NoAtmStrike.to_string(), "no_atm_strike");
    }

    #[test]
    fn test_core_error_converts_to_invalid_input() {
        let err: AnalyticsError = CoreError::invalid_field("stock_price", "must be positive").into();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
        assert!(!err.is_missing_data());
    }
}
