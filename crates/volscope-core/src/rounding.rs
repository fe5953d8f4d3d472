//! Display rounding.
//!
//! All analytics run in full `f64` precision. Rounding happens once, when an
//! output record is built, so the spread and skew subtractions never compound
//! rounding error.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Number of decimal places used for reported values.
pub const DISPLAY_DECIMALS: u32 = 2;

/// Rounds a value to `dp` decimal places for display.
///
/// The exact binary value of `value` is converted to a [`Decimal`] and rounded
/// half-to-even, so `2.675` (stored as `2.67499…`) rounds to `2.67` and a true
/// midpoint like `0.125` rounds to `0.12`. Non-finite values, and values too
/// large for a `Decimal`, are returned unchanged.
///
/// # Example
///
/// ```rust
/// use volscope_core::rounding::round_display;
///
/// assert_eq!(round_display((0.35 - 0.30) * 100.0, 2), 5.0);
/// ```
#[must_use]
pub fn round_display(value: f64, dp: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(dp))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
