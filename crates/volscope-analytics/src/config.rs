//! Analysis configuration.
//!
//! Every field has a default, so a partial `[analysis]` table in a TOML file
//! only overrides what it names. The defaults reproduce the standard 30-day,
//! 25-delta analysis.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Upper bound for configured days-to-expiration (ten years).
pub const MAX_DTE: i64 = 3650;

/// Tunable parameters of the analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Contracts closer to expiration than this are ignored.
    #[serde(default = "default_min_dte")]
    pub min_dte: i64,

    /// Preferred days-to-expiration of the analyzed bucket.
    #[serde(default = "default_target_dte")]
    pub target_dte: i64,

    /// Delta targeted on the call side of the skew.
    #[serde(default = "default_call_target_delta")]
    pub call_target_delta: f64,

    /// Delta targeted on the put side of the skew.
    #[serde(default = "default_put_target_delta")]
    pub put_target_delta: f64,

    /// Decimal places of reported values.
    #[serde(default = "default_display_decimals")]
    pub display_decimals: u32,

    /// Log-return window for historical volatility.
    #[serde(default = "default_hv_window")]
    pub hv_window: usize,

    /// Bars in the high/low range lookback (52 weeks).
    #[serde(default = "default_range_lookback")]
    pub range_lookback: usize,
}

fn default_min_dte() -> i64 {
    25
}

fn default_target_dte() -> i64 {
    30
}

fn default_call_target_delta() -> f64 {
    0.25
}

fn default_put_target_delta() -> f64 {
    -0.25
}

fn default_display_decimals() -> u32 {
    volscope_core::rounding::DISPLAY_DECIMALS
}

fn default_hv_window() -> usize {
    crate::historical::DEFAULT_HV_WINDOW
}

fn default_range_lookback() -> usize {
    crate::range::FIFTY_TWO_WEEK_BARS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_dte: default_min_dte(),
            target_dte: default_target_dte(),
            call_target_delta: default_call_target_delta(),
            put_target_delta: default_put_target_delta(),
            display_decimals: default_display_decimals(),
            hv_window: default_hv_window(),
            range_lookback: default_range_lookback(),
        }
    }
}

impl AnalysisConfig {
    /// Checks the parameters are usable.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(0..=MAX_DTE).contains(&self.min_dte) {
            return Err(AnalyticsError::invalid_input(format!(
                "min_dte must be within [0, {MAX_DTE}], got {}",
                self.min_dte
            )));
        }
        if !(self.min_dte..=MAX_DTE).contains(&self.target_dte) {
            return Err(AnalyticsError::invalid_input(format!(
                "target_dte must be within [min_dte, {MAX_DTE}], got {}",
                self.target_dte
            )));
        }
        if !(0.0..=1.0).contains(&self.call_target_delta) {
            return Err(AnalyticsError::invalid_input(format!(
                "call_target_delta must be within [0, 1], got {}",
                self.call_target_delta
            )));
        }
        if !(-1.0..=0.0).contains(&self.put_target_delta) {
            return Err(AnalyticsError::invalid_input(format!(
                "put_target_delta must be within [-1, 0], got {}",
                self.put_target_delta
            )));
        }
        if self.display_decimals > 10 {
            return Err(AnalyticsError::invalid_input(format!(
                "display_decimals must be at most 10, got {}",
                self.display_decimals
            )));
        }
        if self.hv_window < 2 {
            return Err(AnalyticsError::invalid_input(format!(
                "hv_window must be at least 2, got {}",
                self.hv_window
            )));
        }
        if self.range_lookback == 0 {
            return Err(AnalyticsError::invalid_input("range_lookback must be positive"));
        }
        Ok(())
    }
}
