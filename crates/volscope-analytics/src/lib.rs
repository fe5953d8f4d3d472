//! # Volscope Analytics
//!
//! Calculation engine for options volatility analysis.
//!
//! - **Volatility**: ATM implied volatility, IV/HV spread and 25-delta skew
//!   from an options chain snapshot
//! - **Historical**: close-to-close historical volatility, annualized
//! - **Range**: 52-week high/low and range rank
//! - **Batch**: per-ticker fan-out with partial results
//!
//! Everything here is pure and synchronous. The reference date for
//! days-to-expiration is always passed in; nothing reads the clock.
//!
//! ## Usage
//!
//! ```rust
//! use volscope_analytics::prelude::*;
//! use volscope_core::prelude::*;
//!
//! let as_of = Date::from_ymd(2025, 6, 2).unwrap();
//! let expiry = as_of.add_days(31);
//! let chain = vec![
//!     OptionContract::new(expiry, 100.0, ContractType::Call, 0.24, 0.52),
//!     OptionContract::new(expiry, 110.0, ContractType::Call, 0.22, 0.26),
//!     OptionContract::new(expiry, 90.0, ContractType::Put, 0.31, -0.24),
//! ];
//! let request = AnalysisRequest::new("SPY", 101.0, chain, 18.5);
//!
//! let analyzer = VolatilityAnalyzer::new(AnalysisConfig::default());
//! let result = analyzer.analyze(&request, as_of).unwrap();
//! assert_eq!(result.atm_iv_percent, 24.0);
//! assert_eq!(result.skew_25_delta, 9.0);
//! ```
//!
//! ## Features
//!
//! - `parallel`: analyze batches on the rayon thread pool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod batch;
pub mod config;
pub mod error;
pub mod historical;
pub mod range;
pub mod volatility;

pub use config::AnalysisConfig;
pub use error::{AnalyticsError, AnalyticsResult, FailureKind};

/// Prelude module for convenient imports.
///
/// ```rust
/// use volscope_analytics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::batch::{AnalysisFailure, BatchAnalyzer, BatchReport, BatchStats, TickerOutcome};
    pub use crate::config::AnalysisConfig;
    pub use crate::error::{AnalyticsError, AnalyticsResult, FailureKind};
    pub use crate::historical::{
        historical_volatility, log_returns, rolling_historical_volatility, DEFAULT_HV_WINDOW,
        TRADING_DAYS_PER_YEAR,
    };
    pub use crate::range::{range_rank, RangeRank, FIFTY_TWO_WEEK_BARS};
    pub use crate::volatility::{
        analyze_volatility, find_atm_contract, find_delta_contract, select_expiration_bucket,
        ExpirationBucket, VolatilityAnalyzer, VolatilityBreakdown,
    };
}
