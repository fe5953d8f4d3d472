//! Calendar date type.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{CoreError, CoreResult};

/// A calendar date.
///
/// This is a newtype wrapper around `chrono::NaiveDate`. Expiration dates and
/// analysis reference dates are both plain calendar dates, so days-to-expiration
/// is a whole-day difference with no time-of-day component.
///
/// # Example
///
/// ```rust
/// use volscope_core::types::Date;
///
/// let as_of = Date::from_ymd(2025, 6, 18).unwrap();
/// let expiry = as_of.add_days(30);
/// assert_eq!(expiry - as_of, 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Creates a date from either `YYYY-MM-DD` or an ISO 8601 date-time.
    ///
    /// Feeds commonly send expirations as `2025-07-18T00:00:00Z` or
    /// `2025-07-18 16:00:00`; only the calendar date part is kept.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if no date can be read from the string.
    pub fn parse_lenient(s: &str) -> CoreResult<Self> {
        let trimmed = s.trim();
        if let Ok(date) = Self::parse(trimmed) {
            return Ok(date);
        }

        match trimmed.get(..10) {
            Some(prefix) if trimmed[10..].starts_with(['T', ' ']) => Self::parse(prefix),
            _ => Err(CoreError::invalid_date(format!("Cannot parse: {s}"))),
        }
    }

    /// Returns today's local date.
    ///
    /// This is the single wall-clock read in the workspace. Call it at the
    /// outermost boundary and pass the result down as a reference date.
    #[must_use]
    pub fn today() -> Self {
        Date(chrono::Local::now().date_naive())
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Calculates the number of calendar days from `self` to `other`.
    ///
    /// Positive when `other` is after `self`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::str::FromStr for Date {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Add<i64> for Date {
    type Output = Self;

    /// Adds days to a date.
    fn add(self, days: i64) -> Self::Output {
        self.add_days(days)
    }
}

impl Sub<i64> for Date {
    type Output = Self;

    /// Subtracts days from a date.
    fn sub(self, days: i64) -> Self::Output {
        self.add_days(-days)
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}
