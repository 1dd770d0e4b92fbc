//! 360-day model calendar and month-code handling.
//!
//! Climate-model output in this family uses an idealized calendar of
//! 12 months x 30 days. Time-axis arithmetic therefore cannot go through
//! a proleptic Gregorian date type; [`Date360`] implements the model
//! calendar directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days per month in the model calendar.
pub const DAYS_PER_MONTH: u32 = 30;

/// Days per year in the model calendar.
pub const DAYS_PER_YEAR: u32 = 360;

/// Two-letter month codes as they appear in archive file names, January first.
pub const MONTH_CODES: [&str; 12] = [
    "ja", "fb", "mr", "ar", "my", "jn", "jl", "ag", "sp", "ot", "nv", "dc",
];

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("unknown month token: {0}")]
    UnknownMonth(String),

    #[error("month {month}, day {day} is outside the 360-day calendar")]
    InvalidDate { month: u32, day: u32 },
}

/// A date in the 12 x 30-day model calendar.
///
/// Ordering is chronological. Years may be negative (paleo runs count from
/// arbitrary epochs).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Date360 {
    year: i32,
    month: u32,
    day: u32,
}

impl Date360 {
    /// Create a date, validating month and day against the model calendar.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) || !(1..=DAYS_PER_MONTH).contains(&day) {
            return Err(CalendarError::InvalidDate { month, day });
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Days elapsed since 0000-01-01 of the model calendar.
    pub fn epoch_days(&self) -> i64 {
        self.year as i64 * DAYS_PER_YEAR as i64
            + (self.month as i64 - 1) * DAYS_PER_MONTH as i64
            + (self.day as i64 - 1)
    }

    /// Inverse of [`Date360::epoch_days`].
    pub fn from_epoch_days(days: i64) -> Self {
        let year = days.div_euclid(DAYS_PER_YEAR as i64);
        let of_year = days.rem_euclid(DAYS_PER_YEAR as i64);
        Self {
            year: year as i32,
            month: (of_year / DAYS_PER_MONTH as i64) as u32 + 1,
            day: (of_year % DAYS_PER_MONTH as i64) as u32 + 1,
        }
    }

    /// Absolute distance to another date, in days.
    pub fn days_between(&self, other: &Date360) -> i64 {
        (self.epoch_days() - other.epoch_days()).abs()
    }
}

impl std::fmt::Display for Date360 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Resolve a month token to its 1-based number.
///
/// Accepts the two-letter codes ("ja".."dc") as well as decimal strings,
/// matching the archive tooling which mixes both forms.
pub fn month_number(token: &str) -> Result<u32, CalendarError> {
    if let Ok(n) = token.parse::<u32>() {
        if (1..=12).contains(&n) {
            return Ok(n);
        }
        return Err(CalendarError::UnknownMonth(token.to_string()));
    }
    MONTH_CODES
        .iter()
        .position(|&c| c == token)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| CalendarError::UnknownMonth(token.to_string()))
}

/// The two-letter code for a 1-based month number.
pub fn month_code(month: u32) -> Option<&'static str> {
    MONTH_CODES.get(month as usize - 1).copied()
}

/// Resolve a list of month tokens to 1-based numbers, preserving order.
pub fn months_to_numbers<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<u32>, CalendarError> {
    tokens.iter().map(|t| month_number(t.as_ref())).collect()
}

/// Which months of the year a dataset should carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthSelection {
    /// All 12 months.
    Full,
    /// An explicit subset, as codes or numbers.
    Months(Vec<String>),
    /// The stream has no month axis (annual-mean output).
    Annual,
}

impl MonthSelection {
    /// Month numbers for this selection, or `None` for annual streams.
    pub fn resolve(&self) -> Result<Option<Vec<u32>>, CalendarError> {
        match self {
            MonthSelection::Full => Ok(Some((1..=12).collect())),
            MonthSelection::Months(tokens) => Ok(Some(months_to_numbers(tokens)?)),
            MonthSelection::Annual => Ok(None),
        }
    }
}
