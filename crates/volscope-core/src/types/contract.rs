//! Option contract records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Date;
use crate::error::CoreError;

/// Option type (call or put).
///
/// Serialized in lowercase (`"call"` / `"put"`), matching option-chain feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    /// Right to buy the underlying.
    Call,
    /// Right to sell the underlying.
    Put,
}

impl ContractType {
    /// Returns the lowercase wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Call => "call",
            ContractType::Put => "put",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractType {
    type Err = CoreError;

    /// Parses `call` / `put`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(ContractType::Call),
            "put" => Ok(ContractType::Put),
            other => Err(CoreError::invalid_field(
                "contract_type",
                format!("expected 'call' or 'put', got '{other}'"),
            )),
        }
    }
}

/// A single entry of an options chain snapshot.
///
/// `implied_volatility` is a decimal fraction (0.35 = 35%). Calls carry delta in
/// `[0, 1]` and puts in `[-1, 0]`; the analyzer relies on that sign convention
/// but does not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Expiration date.
    pub expiration_date: Date,
    /// Strike price.
    pub strike_price: f64,
    /// Call or put.
    pub contract_type: ContractType,
    /// Implied volatility as a decimal fraction.
    pub implied_volatility: f64,
    /// Option delta.
    pub delta: f64,
}

impl OptionContract {
    /// Creates a new contract record.
    #[must_use]
    pub fn new(
        expiration_date: Date,
        strike_price: f64,
        contract_type: ContractType,
        implied_volatility: f64,
        delta: f64,
    ) -> Self {
        Self {
            expiration_date,
            strike_price,
            contract_type,
            implied_volatility,
            delta,
        }
    }

    /// Calendar days from `as_of` to expiration. Negative once expired.
    #[must_use]
    pub fn days_to_expiration(&self, as_of: Date) -> i64 {
        as_of.days_between(&self.expiration_date)
    }

    /// Whether the delta sign agrees with the contract type.
    #[must_use]
    pub fn has_consistent_delta(&self) -> bool {
        match self.contract_type {
            ContractType::Call => self.delta >= 0.0,
            ContractType::Put => self.delta <= 0.0,
        }
    }

    /// Implied volatility on the percentage scale.
    #[must_use]
    pub fn iv_percent(&self) -> f64 {
        self.implied_volatility * 100.0
    }
}
