//! 52-week range rank.
//!
//! Where the last close sits between the highest high and lowest low of the
//! lookback, as a percentage. Used for index context next to the per-ticker
//! volatility figures.

use serde::{Deserialize, Serialize};

use volscope_core::rounding::round_display;
use volscope_core::{Date, PriceBar};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Daily bars in 52 weeks.
pub const FIFTY_TWO_WEEK_BARS: usize = 252;

/// Rank reported when the lookback has no range.
pub const FLAT_RANGE_RANK: f64 = 50.0;

/// Position of the last close within the lookback range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeRank {
    /// Session date of the most recent bar, when the bars are dated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<Date>,
    /// Close of the most recent bar.
    pub last_close: f64,
    /// Highest high over the lookback.
    #[serde(rename = "52_week_high")]
    pub high_52_week: f64,
    /// Lowest low over the lookback.
    #[serde(rename = "52_week_low")]
    pub low_52_week: f64,
    /// `(close - low) / (high - low) * 100`.
    #[serde(rename = "52_week_rank_percent")]
    pub rank_percent: f64,
}

impl RangeRank {
    /// Copy with every figure rounded to `dp` places.
    #[must_use]
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            as_of: self.as_of,
            last_close: round_display(self.last_close, dp),
            high_52_week: round_display(self.high_52_week, dp),
            low_52_week: round_display(self.low_52_week, dp),
            rank_percent: round_display(self.rank_percent, dp),
        }
    }
}

/// Range rank over the last `lookback` bars.
///
/// Fewer than `lookback` bars is [`AnalyticsError::InsufficientHistory`].
pub fn range_rank(bars: &[PriceBar], lookback: usize) -> AnalyticsResult<RangeRank> {
    if lookback == 0 {
        return Err(AnalyticsError::invalid_input("lookback must be positive"));
    }
    if bars.len() < lookback {
        return Err(AnalyticsError::InsufficientHistory {
            required: lookback,
            available: bars.len(),
        });
    }

    let window = &bars[bars.len() - lookback..];
    if let Some(bar) = window
        .iter()
        .find(|b| !(b.high.is_finite() && b.low.is_finite() && b.close.is_finite()))
    {
        return Err(AnalyticsError::invalid_input(format!(
            "bar values must be finite, got high {} low {} close {}",
            bar.high, bar.low, bar.close
        )));
    }

    let high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let last = &window[window.len() - 1];
    let last_close = last.close;

    let rank_percent = if high == low {
        FLAT_RANGE_RANK
    } else {
        (last_close - low) / (high - low) * 100.0
    };

    Ok(RangeRank {
        as_of: last.date,
        last_close,
        high_52_week: high,
        low_52_week: low,
        rank_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bars(n: usize) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let mid = 100.0 + i as f64 * 0.1;
                PriceBar::new(mid + 1.0, mid - 1.0, mid)
            })
            .collect()
    }

    #[test]
    fn test_rank_near_top_of_uptrend() {
        let bars = bars(300);
        let rank = range_rank(&bars, FIFTY_TWO_WEEK_BARS).unwrap();

        // window starts at bar 48
        assert_relative_eq!(rank.high_52_week, 100.0 + 299.0 * 0.1 + 1.0, epsilon = 1e-9);
        assert_relative_eq!(rank.low_52_week, 100.0 + 48.0 * 0.1 - 1.0, epsilon = 1e-9);
        assert_relative_eq!(rank.last_close, 100.0 + 299.0 * 0.1, epsilon = 1e-9);
        assert!(rank.rank_percent > 90.0 && rank.rank_percent < 100.0);
    }

    #[test]
    fn test_flat_range_reports_midpoint() {
        let bars = vec![PriceBar::new(10.0, 10.0, 10.0); 5];
        let rank = range_rank(&bars, 5).unwrap();
        assert_eq!(rank.rank_percent, FLAT_RANGE_RANK);
    }

    #[test]
    fn test_exact_rank() {
        let bars = vec![
            PriceBar::new(12.0, 8.0, 10.0),
            PriceBar::new(11.0, 9.0, 9.0),
        ];
        let rank = range_rank(&bars, 2).unwrap();
        assert_relative_eq!(rank.rank_percent, 25.0);
        assert_eq!(rank.as_of, None);
    }

    #[test]
    fn test_last_bar_date_is_reported() {
        let day = Date::from_ymd(2025, 6, 2).unwrap();
        let bars = vec![
            PriceBar::new(12.0, 8.0, 10.0).on(day),
            PriceBar::new(11.0, 9.0, 9.0).on(day.add_days(1)),
        ];
        let rank = range_rank(&bars, 2).unwrap().rounded(2);
        assert_eq!(rank.as_of, Some(day.add_days(1)));

        let json = serde_json::to_value(rank).unwrap();
        assert_eq!(json["as_of"], "2025-06-03");
    }

    #[test]
    fn test_insufficient_bars() {
        let err = range_rank(&bars(100), FIFTY_TWO_WEEK_BARS).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientHistory {
                required: 252,
                available: 100,
            }
        );
    }

    #[test]
    fn test_rounded_wire_names() {
        let rank = RangeRank {
            as_of: None,
            last_close: 101.456,
            high_52_week: 120.004,
            low_52_week: 80.0,
            rank_percent: 53.6399,
        }
        .rounded(2);

        let json = serde_json::to_value(rank).unwrap();
        assert_eq!(json["last_close"], 101.46);
        assert_eq!(json["52_week_high"], 120.0);
        assert_eq!(json["52_week_low"], 80.0);
        assert_eq!(json["52_week_rank_percent"], 53.64);
    }
}
