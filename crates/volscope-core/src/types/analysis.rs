//! Analysis request and result records.

use serde::{Deserialize, Serialize};

use super::{Date, OptionContract};
use crate::rounding::round_display;

/// A validated request for volatility analysis of one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Ticker symbol, echoed in the result.
    pub ticker: String,
    /// Reference price of the underlying.
    pub stock_price: f64,
    /// Options chain snapshot.
    pub options_chain: Vec<OptionContract>,
    /// Historical volatility on the percentage scale (28.5 = 28.5%).
    pub historical_volatility: f64,
    /// Reference date for days-to-expiration. Callers substitute today when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<Date>,
}

impl AnalysisRequest {
    /// Creates a request without an explicit reference date.
    #[must_use]
    pub fn new(
        ticker: impl Into<String>,
        stock_price: f64,
        options_chain: Vec<OptionContract>,
        historical_volatility: f64,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            stock_price,
            options_chain,
            historical_volatility,
            as_of: None,
        }
    }

    /// Sets the reference date.
    #[must_use]
    pub fn with_as_of(mut self, as_of: Date) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// Returns the request's reference date, or `fallback` when none was given.
    #[must_use]
    pub fn reference_date_or(&self, fallback: Date) -> Date {
        self.as_of.unwrap_or(fallback)
    }
}

/// Volatility analysis output for one ticker.
///
/// All three figures are on the percentage scale and already rounded for
/// display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Ticker symbol from the request.
    pub ticker: String,
    /// At-the-money implied volatility, percent.
    pub atm_iv_percent: f64,
    /// ATM IV minus historical volatility, percentage points.
    pub iv_hv_spread_percent: f64,
    /// 25-delta put IV minus 25-delta call IV, percentage points.
    pub skew_25_delta: f64,
}

impl AnalysisResult {
    /// Builds a result from full-precision values, rounding each to `dp` places.
    #[must_use]
    pub fn rounded(
        ticker: impl Into<String>,
        atm_iv_percent: f64,
        iv_hv_spread_percent: f64,
        skew_25_delta: f64,
        dp: u32,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            atm_iv_percent: round_display(atm_iv_percent, dp),
            iv_hv_spread_percent: round_display(iv_hv_spread_percent, dp),
            skew_25_delta: round_display(skew_25_delta, dp),
        }
    }

    /// Whether option premium looks rich or cheap against realized movement.
    #[must_use]
    pub fn premium_bias(&self) -> PremiumBias {
        PremiumBias::from_spread(self.iv_hv_spread_percent)
    }

    /// Direction of the 25-delta skew.
    #[must_use]
    pub fn skew_bias(&self) -> SkewBias {
        SkewBias::from_skew(self.skew_25_delta)
    }
}

/// Reading of the IV/HV spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumBias {
    /// Options price more movement than realized (positive spread).
    Rich,
    /// Options price less movement than realized (negative spread).
    Cheap,
    /// Implied and historical volatility agree.
    Fair,
}

impl PremiumBias {
    /// Classifies a spread by sign.
    #[must_use]
    pub fn from_spread(spread: f64) -> Self {
        if spread > 0.0 {
            PremiumBias::Rich
        } else if spread < 0.0 {
            PremiumBias::Cheap
        } else {
            PremiumBias::Fair
        }
    }

    /// Short label for tables.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            PremiumBias::Rich => "rich",
            PremiumBias::Cheap => "cheap",
            PremiumBias::Fair => "fair",
        }
    }
}

/// Reading of the 25-delta skew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkewBias {
    /// Downside puts richer than upside calls.
    PutSkew,
    /// Upside calls richer than downside puts.
    CallSkew,
    /// No difference at 25 delta.
    Flat,
}

impl SkewBias {
    /// Classifies a skew by sign.
    #[must_use]
    pub fn from_skew(skew: f64) -> Self {
        if skew > 0.0 {
            SkewBias::PutSkew
        } else if skew < 0.0 {
            SkewBias::CallSkew
        } else {
            SkewBias::Flat
        }
    }

    /// Short label for tables.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SkewBias::PutSkew => "put skew",
            SkewBias::CallSkew => "call skew",
            SkewBias::Flat => "flat",
        }
    }
}
