//! # Volscope Core
//!
//! Core types, validation, and rounding for the Volscope options volatility
//! analytics library.
//!
//! This crate provides the foundational building blocks used throughout Volscope:
//!
//! - **Types**: Domain records like [`Date`], [`OptionContract`], [`AnalysisRequest`]
//!   and [`AnalysisResult`]
//! - **Validation**: Permissive wire records that are checked field by field before
//!   they reach any analytics code
//! - **Rounding**: Display rounding applied once, at the output boundary
//!
//! ## Design Philosophy
//!
//! - **Validate at the Boundary**: Malformed chain entries are rejected with a
//!   clear error before selection logic runs
//! - **Explicit Reference Dates**: [`Date::today`] is the only clock read; everything
//!   else takes the reference date as a parameter
//! - **Full Precision Until Output**: Values are rounded only when a result is built
//!
//! ## Example
//!
//! ```rust
//! use volscope_core::prelude::*;
//!
//! let expiry = Date::from_ymd(2025, 7, 18).unwrap();
//! let call = OptionContract::new(expiry, 100.0, ContractType::Call, 0.30, 0.50);
//!
//! let as_of = Date::from_ymd(2025, 6, 18).unwrap();
//! assert_eq!(call.days_to_expiration(as_of), 30);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod rounding;
pub mod types;
pub mod validation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::rounding::{round_display, DISPLAY_DECIMALS};
    pub use crate::types::{
        AnalysisRequest, AnalysisResult, ContractType, Date, OptionContract, PremiumBias,
        PriceBar, SkewBias,
    };
    pub use crate::validation::{LooseNumber, RawAnalysisRequest, RawOptionContract};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{AnalysisRequest, AnalysisResult, ContractType, Date, OptionContract, PriceBar};
