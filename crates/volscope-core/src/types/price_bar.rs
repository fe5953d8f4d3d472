//! Daily price bars.

use serde::{Deserialize, Serialize};

use super::Date;

/// One daily bar of an underlying or index.
///
/// Only the fields the volatility and range analytics read are carried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Session date, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Session close.
    pub close: f64,
}

impl PriceBar {
    /// Creates an undated bar.
    #[must_use]
    pub fn new(high: f64, low: f64, close: f64) -> Self {
        Self {
            date: None,
            high,
            low,
            close,
        }
    }

    /// Attaches a session date.
    #[must_use]
    pub fn on(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }
}
