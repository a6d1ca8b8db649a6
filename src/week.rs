//! Week keys - the partition key for planner documents.
//!
//! A week key is a string of the form `<ISO-year>-W<2-digit-week>`, e.g.
//! `2025-W45`. Every stored document is addressed by exactly one week key,
//! and the key doubles as a storage path segment, so parsing also acts as
//! sanitization: a parsed key can only render back to `[0-9]` and `-W`.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeekKeyError {
    #[error("invalid week key: {0:?}")]
    Invalid(String),
    #[error("week number out of range: {0}")]
    WeekOutOfRange(u32),
}

/// A validated ISO week identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    /// Build a key from an ISO year and week number (1-53).
    pub fn new(year: i32, week: u32) -> Result<Self, WeekKeyError> {
        if !(1..=53).contains(&week) {
            return Err(WeekKeyError::WeekOutOfRange(week));
        }
        Ok(Self { year, week })
    }

    /// The week key containing the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// The week key for today's date.
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = WeekKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year_part, week_part) = s
            .split_once("-W")
            .ok_or_else(|| WeekKeyError::Invalid(s.to_string()))?;

        if year_part.len() != 4 || !year_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WeekKeyError::Invalid(s.to_string()));
        }
        if week_part.len() != 2 || !week_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WeekKeyError::Invalid(s.to_string()));
        }

        let year: i32 = year_part
            .parse()
            .map_err(|_| WeekKeyError::Invalid(s.to_string()))?;
        let week: u32 = week_part
            .parse()
            .map_err(|_| WeekKeyError::Invalid(s.to_string()))?;

        Self::new(year, week)
    }
}
