//! The volatility analyzer.
//!
//! Reduces an options chain snapshot to three figures for one ticker:
//!
//! - **ATM IV**: implied volatility of the contract struck closest to spot,
//!   in the expiration bucket nearest 30 days out (at least 25 days).
//! - **IV/HV spread**: ATM IV minus historical volatility. Positive means
//!   premium is rich relative to realized movement.
//! - **25-delta skew**: 25-delta put IV minus 25-delta call IV. Positive is
//!   the usual equity downside skew.
//!
//! Implied volatilities arrive as decimal fractions and are scaled to percent
//! only at output; historical volatility already arrives in percent. Rounding
//! happens once, on the final figures.
//!
//! The reference date is always an argument. Reading the clock is left to the
//! outermost caller, so the same inputs always give the same result.

mod selection;

pub use selection::{
    closest_position, find_atm_contract, find_delta_contract, select_expiration_bucket,
    ExpirationBucket,
};

use volscope_core::{AnalysisRequest, AnalysisResult, Date, OptionContract};

use crate::config::AnalysisConfig;
use crate::error::{AnalyticsError, AnalyticsResult};

/// Full-precision breakdown of one analysis, with the contracts picked.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityBreakdown {
    /// Days-to-expiration of the analyzed bucket.
    pub dte: i64,
    /// Contract used for ATM IV.
    pub atm_contract: OptionContract,
    /// Call closest to the target call delta.
    pub call_contract: OptionContract,
    /// Put closest to the target put delta.
    pub put_contract: OptionContract,
    /// Unrounded ATM IV, percent.
    pub atm_iv_percent: f64,
    /// Unrounded IV/HV spread, percentage points.
    pub iv_hv_spread_percent: f64,
    /// Unrounded skew, percentage points.
    pub skew_25_delta: f64,
}

/// Volatility analyzer for options chains.
///
/// Stateless apart from its configuration; one instance can serve any number
/// of tickers concurrently.
#[derive(Debug, Clone, Default)]
pub struct VolatilityAnalyzer {
    config: AnalysisConfig,
}

impl VolatilityAnalyzer {
    /// Creates an analyzer with the given configuration.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// The analyzer's configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes a validated request.
    ///
    /// The request's own `as_of` takes precedence; `as_of` is used when the
    /// request carries none.
    pub fn analyze(&self, request: &AnalysisRequest, as_of: Date) -> AnalyticsResult<AnalysisResult> {
        self.analyze_chain(
            &request.ticker,
            request.stock_price,
            &request.options_chain,
            request.historical_volatility,
            request.reference_date_or(as_of),
        )
    }

    /// Analyzes a chain and rounds the figures for display.
    pub fn analyze_chain(
        &self,
        ticker: &str,
        stock_price: f64,
        chain: &[OptionContract],
        historical_volatility: f64,
        as_of: Date,
    ) -> AnalyticsResult<AnalysisResult> {
        let breakdown = self.breakdown(ticker, stock_price, chain, historical_volatility, as_of)?;
        Ok(AnalysisResult::rounded(
            ticker,
            breakdown.atm_iv_percent,
            breakdown.iv_hv_spread_percent,
            breakdown.skew_25_delta,
            self.config.display_decimals,
        ))
    }

    /// Runs the analysis and returns the unrounded figures with the contracts
    /// behind them.
    pub fn breakdown(
        &self,
        ticker: &str,
        stock_price: f64,
        chain: &[OptionContract],
        historical_volatility: f64,
        as_of: Date,
    ) -> AnalyticsResult<VolatilityBreakdown> {
        if !stock_price.is_finite() || stock_price <= 0.0 {
            return Err(AnalyticsError::invalid_input(format!(
                "stock_price must be positive and finite, got {stock_price}"
            )));
        }
        if !historical_volatility.is_finite() {
            return Err(AnalyticsError::invalid_input(format!(
                "historical_volatility must be finite, got {historical_volatility}"
            )));
        }

        let bucket = select_expiration_bucket(
            chain,
            as_of,
            self.config.min_dte,
            self.config.target_dte,
        )
        .ok_or_else(|| AnalyticsError::NoQualifyingExpiration {
            ticker: ticker.to_string(),
            min_dte: self.config.min_dte,
        })?;
        log::debug!(
            "{ticker}: using DTE {} bucket ({} contracts)",
            bucket.dte,
            bucket.len()
        );

        // A selected bucket always holds a contract; keep the distinct failure
        // in case the bucket selection rules change.
        let atm = find_atm_contract(&bucket.contracts, stock_price).ok_or_else(|| {
            AnalyticsError::NoAtmStrike {
                ticker: ticker.to_string(),
                dte: bucket.dte,
            }
        })?;
        log::debug!(
            "{ticker}: ATM strike {} ({}) for spot {stock_price}",
            atm.strike_price,
            atm.contract_type
        );

        let atm_iv_percent = atm.iv_percent();
        let iv_hv_spread_percent = atm_iv_percent - historical_volatility;

        let calls = bucket.calls();
        let puts = bucket.puts();
        let (call, put) = match (
            find_delta_contract(&calls, self.config.call_target_delta),
            find_delta_contract(&puts, self.config.put_target_delta),
        ) {
            (Some(call), Some(put)) => (call, put),
            _ => {
                return Err(AnalyticsError::MissingCallsOrPuts {
                    ticker: ticker.to_string(),
                    dte: bucket.dte,
                    calls: calls.len(),
                    puts: puts.len(),
                })
            }
        };
        log::debug!(
            "{ticker}: skew legs call delta {} / put delta {}",
            call.delta,
            put.delta
        );

        let skew_25_delta = (put.implied_volatility - call.implied_volatility) * 100.0;

        Ok(VolatilityBreakdown {
            dte: bucket.dte,
            atm_contract: atm.clone(),
            call_contract: call.clone(),
            put_contract: put.clone(),
            atm_iv_percent,
            iv_hv_spread_percent,
            skew_25_delta,
        })
    }
}

/// Analyzes one ticker with the default configuration.
///
/// `historical_volatility` is on the percentage scale; contract IVs are
/// decimal fractions. Days-to-expiration are counted from `as_of`.
///
/// # Example
///
/// ```rust
/// use volscope_analytics::volatility::analyze_volatility;
/// use volscope_core::{ContractType, Date, OptionContract};
///
/// let as_of = Date::from_ymd(2025, 6, 2).unwrap();
/// let expiry = as_of.add_days(30);
/// let chain = vec![
///     OptionContract::new(expiry, 100.0, ContractType::Call, 0.30, 0.50),
///     OptionContract::new(expiry, 100.0, ContractType::Put, 0.35, -0.50),
/// ];
///
/// let result = analyze_volatility("AAPL", 100.0, &chain, 25.0, as_of).unwrap();
/// assert_eq!(result.atm_iv_percent, 30.0);
/// assert_eq!(result.iv_hv_spread_percent, 5.0);
/// assert_eq!(result.skew_25_delta, 5.0);
/// ```
pub fn analyze_volatility(
    ticker: &str,
    stock_price: f64,
    chain: &[OptionContract],
    historical_volatility: f64,
    as_of: Date,
) -> AnalyticsResult<AnalysisResult> {
    VolatilityAnalyzer::default().analyze_chain(
        ticker,
        stock_price,
        chain,
        historical_volatility,
        as_of,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use volscope_core::ContractType;

    fn as_of() -> Date {
        Date::from_ymd(2025, 6, 2).unwrap()
    }

    fn call(dte: i64, strike: f64, iv: f64, delta: f64) -> OptionContract {
        OptionContract::new(as_of().add_days(dte), strike, ContractType::Call, iv, delta)
    }

    fn put(dte: i64, strike: f64, iv: f64, delta: f64) -> OptionContract {
        OptionContract::new(as_of().add_days(dte), strike, ContractType::Put, iv, delta)
    }

    /// A 30-day chain with a realistic smile around spot 100.
    fn smile_chain() -> Vec<OptionContract> {
        vec![
            call(30, 90.0, 0.27, 0.80),
            call(30, 100.0, 0.24, 0.52),
            call(30, 110.0, 0.22, 0.26),
            call(30, 120.0, 0.23, 0.10),
            put(30, 80.0, 0.38, -0.09),
            put(30, 90.0, 0.31, -0.24),
            put(30, 100.0, 0.25, -0.48),
            put(30, 110.0, 0.23, -0.74),
            call(9, 100.0, 0.40, 0.51),
            put(9, 100.0, 0.41, -0.49),
        ]
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    #[test]
    fn test_at_the_money_pair() {
        let chain = vec![call(30, 100.0, 0.30, 0.50), put(30, 100.0, 0.35, -0.50)];

        let result = analyze_volatility("AAPL", 100.0, &chain, 25.0, as_of()).unwrap();

        assert_eq!(result.ticker, "AAPL");
        assert_eq!(result.atm_iv_percent, 30.0);
        assert_eq!(result.iv_hv_spread_percent, 5.0);
        assert_eq!(result.skew_25_delta, 5.0);
    }

    #[test]
    fn test_put_listed_first_wins_atm() {
        let chain = vec![put(30, 100.0, 0.35, -0.50), call(30, 100.0, 0.30, 0.50)];

        let result = analyze_volatility("AAPL", 100.0, &chain, 25.0, as_of()).unwrap();

        assert_eq!(result.atm_iv_percent, 35.0);
        assert_eq!(result.iv_hv_spread_percent, 10.0);
        assert_eq!(result.skew_25_delta, 5.0);
    }

    #[test]
    fn test_smile_chain() {
        let analyzer = VolatilityAnalyzer::default();
        let breakdown = analyzer
            .breakdown("SPY", 101.0, &smile_chain(), 18.5, as_of())
            .unwrap();

        assert_eq!(breakdown.dte, 30);
        assert_eq!(breakdown.atm_contract.strike_price, 100.0);
        assert_eq!(breakdown.atm_contract.contract_type, ContractType::Call);
        assert_eq!(breakdown.call_contract.strike_price, 110.0);
        assert_eq!(breakdown.put_contract.strike_price, 90.0);
        assert_relative_eq!(breakdown.atm_iv_percent, 24.0, epsilon = 1e-9);
        assert_relative_eq!(breakdown.iv_hv_spread_percent, 5.5, epsilon = 1e-9);
        assert_relative_eq!(breakdown.skew_25_delta, 9.0, epsilon = 1e-9);

        let result = analyzer
            .analyze_chain("SPY", 101.0, &smile_chain(), 18.5, as_of())
            .unwrap();
        assert_eq!(result.atm_iv_percent, 24.0);
        assert_eq!(result.iv_hv_spread_percent, 5.5);
        assert_eq!(result.skew_25_delta, 9.0);
    }

    #[test]
    fn test_short_dated_bucket_excluded() {
        let chain = vec![
            call(20, 100.0, 0.50, 0.50),
            put(20, 100.0, 0.55, -0.50),
            call(40, 100.0, 0.30, 0.50),
            put(40, 100.0, 0.32, -0.50),
        ];

        let breakdown = VolatilityAnalyzer::default()
            .breakdown("QQQ", 100.0, &chain, 20.0, as_of())
            .unwrap();

        assert_eq!(breakdown.dte, 40);
        assert_relative_eq!(breakdown.atm_iv_percent, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_far_bucket_is_used() {
        let chain = vec![call(200, 100.0, 0.30, 0.50), put(200, 100.0, 0.31, -0.50)];
        let breakdown = VolatilityAnalyzer::default()
            .breakdown("IWM", 100.0, &chain, 20.0, as_of())
            .unwrap();
        assert_eq!(breakdown.dte, 200);
    }

    #[test]
    fn test_request_as_of_takes_precedence() {
        let chain = vec![call(30, 100.0, 0.30, 0.50), put(30, 100.0, 0.35, -0.50)];
        let request = AnalysisRequest::new("AAPL", 100.0, chain, 25.0).with_as_of(as_of());

        // fallback date 10 days later would leave only 20 DTE
        let result = VolatilityAnalyzer::default()
            .analyze(&request, as_of().add_days(10))
            .unwrap();
        assert_eq!(result.atm_iv_percent, 30.0);

        let mut request = request;
        request.as_of = None;
        let err = VolatilityAnalyzer::default()
            .analyze(&request, as_of().add_days(10))
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoQualifyingExpiration);
    }

    // =========================================================================
    // Failures
    // =========================================================================

    #[test]
    fn test_empty_chain() {
        let err = analyze_volatility("AAPL", 100.0, &[], 25.0, as_of()).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::NoQualifyingExpiration {
                ticker: "AAPL".to_string(),
                min_dte: 25,
            }
        );
    }

    #[test]
    fn test_all_short_dated() {
        let chain = vec![call(24, 100.0, 0.30, 0.50), put(3, 100.0, 0.35, -0.50)];
        let err = analyze_volatility("AAPL", 100.0, &chain, 25.0, as_of()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoQualifyingExpiration);
        assert!(err.is_missing_data());
    }

    #[test]
    fn test_expired_contracts_never_qualify() {
        let chain = vec![call(-40, 100.0, 0.30, 0.50), put(-40, 100.0, 0.35, -0.50)];
        let err = analyze_volatility("AAPL", 100.0, &chain, 25.0, as_of()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoQualifyingExpiration);
    }

    #[test]
    fn test_calls_only() {
        let chain = vec![call(30, 95.0, 0.30, 0.60), call(30, 105.0, 0.28, 0.40)];
        let err = analyze_volatility("TSLA", 100.0, &chain, 25.0, as_of()).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::MissingCallsOrPuts {
                ticker: "TSLA".to_string(),
                dte: 30,
                calls: 2,
                puts: 0,
            }
        );
    }

    #[test]
    fn test_puts_only() {
        let chain = vec![put(30, 95.0, 0.30, -0.40), call(60, 100.0, 0.30, 0.50)];
        let err = analyze_volatility("TSLA", 100.0, &chain, 25.0, as_of()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MissingCallsOrPuts);
    }

    #[test]
    fn test_invalid_scalars() {
        let chain = vec![call(30, 100.0, 0.30, 0.50), put(30, 100.0, 0.35, -0.50)];
        for price in [0.0, -5.0, f64::NAN] {
            let err = analyze_volatility("X", price, &chain, 25.0, as_of()).unwrap_err();
            assert_eq!(err.kind(), FailureKind::InvalidInput);
        }
        let err = analyze_volatility("X", 100.0, &chain, f64::INFINITY, as_of()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    #[test]
    fn test_custom_config() {
        let config = AnalysisConfig {
            min_dte: 7,
            target_dte: 7,
            display_decimals: 1,
            ..Default::default()
        };
        let result = VolatilityAnalyzer::new(config)
            .analyze_chain("SPY", 100.0, &smile_chain(), 33.33, as_of())
            .unwrap();

        // the 9-day bucket is now closest
        assert_eq!(result.atm_iv_percent, 40.0);
        assert_eq!(result.iv_hv_spread_percent, 6.7);
        assert_eq!(result.skew_25_delta, 1.0);
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn arb_contract() -> impl Strategy<Value = OptionContract> {
        (0i64..120, 50.0f64..150.0, any::<bool>(), 0.05f64..1.5, 0.0f64..1.0).prop_map(
            |(dte, strike, is_call, iv, delta)| {
                if is_call {
                    call(dte, strike, iv, delta)
                } else {
                    put(dte, strike, iv, -delta)
                }
            },
        )
    }

    proptest! {
        #[test]
        fn prop_repeated_calls_agree(
            chain in prop::collection::vec(arb_contract(), 0..40),
            spot in 60.0f64..140.0,
            hv in 5.0f64..80.0,
        ) {
            let first = analyze_volatility("PROP", spot, &chain, hv, as_of());
            let second = analyze_volatility("PROP", spot, &chain, hv, as_of());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_spread_round_trips(
            chain in prop::collection::vec(arb_contract(), 0..40),
            spot in 60.0f64..140.0,
            hv in 5.0f64..80.0,
        ) {
            if let Ok(result) = analyze_volatility("PROP", spot, &chain, hv, as_of()) {
                let recomputed = result.atm_iv_percent - hv;
                prop_assert!((recomputed - result.iv_hv_spread_percent).abs() <= 0.01 + 1e-9);
            }
        }

        #[test]
        fn prop_skew_sign_follows_put_minus_call(
            call_iv in 0.05f64..1.0,
            gap in 0.01f64..0.5,
        ) {
            let put_iv = call_iv + gap;
            let chain = vec![call(30, 110.0, call_iv, 0.25), put(30, 90.0, put_iv, -0.25)];
            let result = analyze_volatility("PROP", 100.0, &chain, 20.0, as_of()).unwrap();
            prop_assert!(result.skew_25_delta > 0.0);

            let flipped = vec![call(30, 110.0, put_iv, 0.25), put(30, 90.0, call_iv, -0.25)];
            let result = analyze_volatility("PROP", 100.0, &flipped, 20.0, as_of()).unwrap();
            prop_assert!(result.skew_25_delta < 0.0);
        }

        #[test]
        fn prop_bucket_is_closest_qualifying(dtes in prop::collection::vec(0i64..120, 1..20)) {
            let chain: Vec<_> = dtes.iter().map(|d| call(*d, 100.0, 0.3, 0.5)).collect();
            let qualifying: Vec<i64> = dtes.iter().copied().filter(|d| *d >= 25).collect();

            match select_expiration_bucket(&chain, as_of(), 25, 30) {
                None => prop_assert!(qualifying.is_empty()),
                Some(bucket) => {
                    prop_assert!(bucket.dte >= 25);
                    for d in &qualifying {
                        prop_assert!((bucket.dte - 30).abs() <= (d - 30).abs());
                    }
                    let expected = dtes.iter().filter(|d| **d == bucket.dte).count();
                    prop_assert_eq!(bucket.len(), expected);
                }
            }
        }
    }
}
