//! Calendar-month bucket keys.
//!
//! The fee ledger is keyed by `"YYYY-MM"` strings. `MonthKey` keeps that
//! wire format as the single externally visible contract while giving the
//! rest of the code a validated, ordered type.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a month key fails.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid month key {0:?}, expected \"YYYY-MM\"")]
pub struct MonthKeyParseError(pub String);

/// A `"YYYY-MM"` calendar month bucket.
///
/// Ordering is chronological; reversed iteration gives the newest-first
/// order used by reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: u16,
    month: u8,
}

impl MonthKey {
    /// Creates a month key from year and 1-based month.
    ///
    /// Returns `None` when the month is outside `1..=12`.
    #[must_use]
    pub fn new(year: u16, month: u8) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Returns the month key containing the given date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self {
            year: date.year() as u16,
            month: date.month() as u8,
        }
    }

    /// The calendar year.
    #[must_use]
    pub const fn year(self) -> u16 {
        self.year
    }

    /// The 1-based month.
    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// All twelve month keys of a year, January first.
    #[must_use]
    pub fn months_of(year: u16) -> [Self; 12] {
        std::array::from_fn(|i| {
            #[allow(clippy::cast_possible_truncation)]
            Self {
                year,
                month: (i + 1) as u8,
            }
        })
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = MonthKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthKeyParseError(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        if !year.bytes().all(|b| b.is_ascii_digit()) || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let year: u16 = year.parse().map_err(|_| err())?;
        let month: u8 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthKeyParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}
