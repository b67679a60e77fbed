//! Calendar-month keys and day-offset arithmetic.
//!
//! Every day and week bucket in the analytics engine is computed on integer
//! day offsets (see [`epoch_day`]). Dates are converted back to calendar form
//! only for display, so nothing here mutates a date field by field.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PulseError;

/// A calendar month in `YYYY-MM` form, the unique key of a monthly summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a key, returning `None` unless `month` is in `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month containing the current UTC date.
    #[must_use]
    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First calendar day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        // Construction guarantees a valid first day.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        date_from_epoch_day(epoch_day(self.next().first_day()) - 1).unwrap_or(NaiveDate::MAX)
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days_in_month(self) -> i64 {
        epoch_day(self.next().first_day()) - epoch_day(self.first_day())
    }

    /// Shift by a signed number of months, crossing year boundaries as needed.
    #[must_use]
    pub fn offset(self, months: i32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(months);
        Self {
            year: i32::try_from(index.div_euclid(12)).unwrap_or(self.year),
            month: u32::try_from(index.rem_euclid(12) + 1).unwrap_or(1),
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        self.offset(1)
    }

    #[must_use]
    pub fn previous(self) -> Self {
        self.offset(-1)
    }

    /// Half-open instant range `[start, end)` covering the month in UTC.
    #[must_use]
    pub fn range(self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.first_day().and_time(NaiveTime::MIN);
        let end = self.next().first_day().and_time(NaiveTime::MIN);
        (
            DateTime::from_naive_utc_and_offset(start, Utc),
            DateTime::from_naive_utc_and_offset(end, Utc),
        )
    }

    /// Whether `instant` falls inside this month (UTC).
    #[must_use]
    pub fn contains(self, instant: DateTime<Utc>) -> bool {
        Self::from_date(instant.date_naive()) == self
    }

    /// `count` consecutive months in chronological order, the last being `end`.
    #[must_use]
    pub fn months_ending_at(end: Self, count: usize) -> Vec<Self> {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        (0..count).rev().map(|back| end.offset(-back)).collect()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PulseError::InvalidInput(format!("'{s}' is not a YYYY-MM month"));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Integer day offset of a calendar date (days since 0001-01-01).
#[must_use]
pub fn epoch_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Inverse of [`epoch_day`].
#[must_use]
pub fn date_from_epoch_day(day: i64) -> Option<NaiveDate> {
    i32::try_from(day)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

/// Day offset of the UTC calendar day an instant falls on.
#[must_use]
pub fn day_of(instant: DateTime<Utc>) -> i64 {
    epoch_day(instant.date_naive())
}
