//! Domain types for options volatility analytics.
//!
//! - [`Date`]: Calendar date used for expirations and reference dates
//! - [`ContractType`] / [`OptionContract`]: One options chain entry
//! - [`AnalysisRequest`] / [`AnalysisResult`]: Analyzer input and output
//! - [`PremiumBias`] / [`SkewBias`]: Sign readings of a result
//! - [`PriceBar`]: Daily bar for historical volatility and range rank

mod analysis;
mod contract;
mod date;
mod price_bar;

pub use analysis::{AnalysisRequest, AnalysisResult, PremiumBias, SkewBias};
pub use contract::{ContractType, OptionContract};
pub use date::Date;
pub use price_bar::PriceBar;
