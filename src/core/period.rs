//! Calendar month identifiers.
//!
//! Months are 1-based throughout the crate. Parsing accepts numbers and English
//! month names so operators can type `1,2` or `jan,feb` when choosing source months.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A (year, month) pair identifying one payroll period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Calendar year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
}

impl PayPeriod {
    /// Builds a period, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        validate_month(month)?;
        Ok(Self { year, month })
    }

    /// The period containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// English month name, e.g. "January".
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// First day of the period.
    #[must_use]
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

/// Rejects month numbers outside 1..=12.
pub fn validate_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(Error::InvalidMonth { month })
    }
}

/// English name of a 1-based month, or "Unknown" when out of range.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// Parses a single month given as a number ("3") or a name/prefix ("mar", "March").
pub fn parse_month(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        validate_month(number)?;
        return Ok(number);
    }

    let lower = trimmed.to_lowercase();
    if lower.len() >= 3 {
        for (idx, name) in (1u32..).zip(MONTH_NAMES) {
            if name.to_lowercase().starts_with(&lower) {
                return Ok(idx);
            }
        }
    }

    Err(Error::Validation {
        message: format!("'{trimmed}' is not a month"),
    })
}

/// Parses a comma- or space-separated month list ("1,2", "jan feb").
///
/// An empty list is returned as an empty set; callers decide whether that is an error.
pub fn parse_month_list(input: &str) -> Result<BTreeSet<u32>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.trim().is_empty())
        .map(parse_month)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_pay_period_rejects_invalid_month() {
        assert!(matches!(
            PayPeriod::new(2024, 13),
            Err(Error::InvalidMonth { month: 13 })
        ));
        assert!(matches!(
            PayPeriod::new(2024, 0),
            Err(Error::InvalidMonth { month: 0 })
        ));
        assert!(PayPeriod::new(2024, 12).is_ok());
    }

    #[test]
    fn test_pay_period_display() {
        let period = PayPeriod::new(2024, 3).unwrap();
        assert_eq!(period.to_string(), "March 2024");
        assert_eq!(period.month_name(), "March");
    }

    #[test]
    fn test_containing() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            PayPeriod::containing(date),
            PayPeriod {
                year: 2024,
                month: 2
            }
        );
    }

    #[test]
    fn test_month_name_out_of_range() {
        assert_eq!(month_name(0), "Unknown");
        assert_eq!(month_name(13), "Unknown");
        assert_eq!(month_name(12), "December");
    }

    #[test]
    fn test_parse_month_numbers_and_names() {
        assert_eq!(parse_month("1").unwrap(), 1);
        assert_eq!(parse_month(" 12 ").unwrap(), 12);
        assert_eq!(parse_month("feb").unwrap(), 2);
        assert_eq!(parse_month("September").unwrap(), 9);
        assert!(parse_month("13").is_err());
        assert!(parse_month("ju").is_err());
        assert!(parse_month("smarch").is_err());
    }

    #[test]
    fn test_parse_month_list() {
        let months = parse_month_list("1, 2 mar").unwrap();
        assert_eq!(months.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);

        let duplicates = parse_month_list("1,1,jan").unwrap();
        assert_eq!(duplicates.len(), 1);

        assert!(parse_month_list("").unwrap().is_empty());
        assert!(parse_month_list("1,foo").is_err());
    }
}
