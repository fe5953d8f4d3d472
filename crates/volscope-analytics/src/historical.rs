//! Close-to-close historical volatility.
//!
//! Annualized sample standard deviation of daily log returns, on the
//! percentage scale the volatility analyzer expects for
//! `historical_volatility`.

use crate::error::{AnalyticsError, AnalyticsResult};

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default return window (30 trading days).
pub const DEFAULT_HV_WINDOW: usize = 30;

/// Daily log returns `ln(c[i] / c[i-1])`.
///
/// Every close must be positive and finite.
pub fn log_returns(closes: &[f64]) -> AnalyticsResult<Vec<f64>> {
    if let Some((index, close)) = closes
        .iter()
        .enumerate()
        .find(|(_, c)| !c.is_finite() || **c <= 0.0)
    {
        return Err(AnalyticsError::invalid_input(format!(
            "close at position {index} must be positive and finite, got {close}"
        )));
    }

    Ok(closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
}

/// Historical volatility over the last `window` returns, in percent.
///
/// Needs at least `window + 1` closes.
///
/// # Example
///
/// ```rust
/// use volscope_analytics::historical::historical_volatility;
///
/// let closes = [100.0, 101.0, 100.0, 101.0, 100.0];
/// let hv = historical_volatility(&closes, 4).unwrap();
/// assert!(hv > 0.0);
/// ```
pub fn historical_volatility(closes: &[f64], window: usize) -> AnalyticsResult<f64> {
    let required = check_window(window)?;
    if closes.len() < required {
        return Err(AnalyticsError::InsufficientHistory {
            required,
            available: closes.len(),
        });
    }

    let returns = log_returns(&closes[closes.len() - required..])?;
    Ok(annualized_percent(&returns))
}

/// Historical volatility at every close once `window` returns are available.
///
/// Element `i` covers the returns ending at close `i + window`.
pub fn rolling_historical_volatility(closes: &[f64], window: usize) -> AnalyticsResult<Vec<f64>> {
    let required = check_window(window)?;
    if closes.len() < required {
        return Err(AnalyticsError::InsufficientHistory {
            required,
            available: closes.len(),
        });
    }

    let returns = log_returns(closes)?;
    Ok(returns.windows(window).map(annualized_percent).collect())
}

/// Validates the window and returns the number of closes it needs.
fn check_window(window: usize) -> AnalyticsResult<usize> {
    if window < 2 {
        return Err(AnalyticsError::invalid_input(format!(
            "window must be at least 2, got {window}"
        )));
    }
    window
        .checked_add(1)
        .ok_or_else(|| AnalyticsError::invalid_input(format!("window too large: {window}")))
}

/// Sample standard deviation (n - 1) annualized to percent.
fn annualized_percent(returns: &[f64]) -> f64 {
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use approx::assert_relative_eq;

    #[test]
    fn test_log_returns() {
        let returns = log_returns(&[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], (1.1f64).ln(), epsilon = 1e-12);
        assert_relative_eq!(returns[1], (0.9f64).ln(), epsilon = 1e-12);
        assert!(log_returns(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_log_returns_rejects_bad_closes() {
        assert!(log_returns(&[100.0, 0.0]).is_err());
        assert!(log_returns(&[100.0, -1.0]).is_err());
        assert!(log_returns(&[f64::NAN, 100.0]).is_err());
    }

    #[test]
    fn test_flat_prices_have_zero_volatility() {
        let closes = vec![50.0; 31];
        assert_relative_eq!(historical_volatility(&closes, 30).unwrap(), 0.0);
    }

    #[test]
    fn test_alternating_returns() {
        // returns alternate +r, -r exactly
        let up = 1.01f64;
        let closes: Vec<f64> = (0..31)
            .map(|i| if i % 2 == 0 { 100.0 } else { 100.0 * up })
            .collect();
        let r = up.ln();

        // 30 returns: 15 of +r and 15 of -r, mean 0
        let expected = (30.0 * r * r / 29.0).sqrt() * 252f64.sqrt() * 100.0;
        assert_relative_eq!(
            historical_volatility(&closes, 30).unwrap(),
            expected,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_uses_most_recent_window() {
        let mut closes = vec![100.0, 150.0, 80.0, 120.0];
        closes.extend(std::iter::repeat(100.0).take(31));
        assert_relative_eq!(historical_volatility(&closes, 30).unwrap(), 0.0);
    }

    #[test]
    fn test_insufficient_history() {
        let closes = vec![100.0; 30];
        let err = historical_volatility(&closes, 30).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientHistory {
                required: 31,
                available: 30,
            }
        );
        assert_eq!(err.kind(), FailureKind::InsufficientHistory);
    }

    #[test]
    fn test_rolling_matches_point_estimate() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + (f64::from(i) * 0.7).sin() * 3.0)
            .collect();
        let rolling = rolling_historical_volatility(&closes, 30).unwrap();

        assert_eq!(rolling.len(), 10);
        assert_relative_eq!(
            rolling[9],
            historical_volatility(&closes, 30).unwrap(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            rolling[0],
            historical_volatility(&closes[..31], 30).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_window_too_small() {
        let err = historical_volatility(&[100.0, 101.0], 1).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }

    #[test]
    fn test_huge_window_is_invalid_input() {
        let closes = [60.0, 61.0, 60.5];
        let err = historical_volatility(&closes, usize::MAX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);

        let err = rolling_historical_volatility(&closes, usize::MAX).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }
}
