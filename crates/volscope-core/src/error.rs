//! Error types for the Volscope core crate.
//!
//! These errors describe malformed input caught at the boundary. Missing-data
//! outcomes of the analytics (no qualifying expiration and friends) live in
//! `volscope-analytics`.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date parsing or an invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// One or more required request keys were absent.
    #[error("Missing required keys: {}", keys.join(", "))]
    MissingKeys {
        /// Names of the absent keys, in declaration order.
        keys: Vec<String>,
    },

    /// A chain entry failed validation.
    #[error("Invalid options_chain entry {index}: {reason}")]
    InvalidContract {
        /// Zero-based position of the entry in the submitted chain.
        index: usize,
        /// Description of what's invalid.
        reason: String,
    },

    /// A scalar request field failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: String,
        /// Description of what's invalid.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid chain entry error.
    #[must_use]
    pub fn invalid_contract(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidContract {
            index,
            reason: reason.into(),
        }
    }

    /// Creates an invalid scalar field error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
