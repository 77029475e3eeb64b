//! Due date validation.
//!
//! Only the canonical `YYYY-MM-DD` form is ever accepted or produced.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const CANONICAL: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Calendar date a task is due on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(Date);

/// Raised when text is not a valid `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date `{input}`: use YYYY-MM-DD")]
pub struct InvalidDate {
    /// Offending input.
    pub input: String,
}

/// Validate user supplied date text.
///
/// Blank input means "no date" and yields `Ok(None)`.
///
/// # Errors
/// Returns [`InvalidDate`] when non-blank input is not a real `YYYY-MM-DD` date.
pub fn validate(input: &str) -> Result<Option<DueDate>, InvalidDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

impl DueDate {
    /// Wrap a calendar date whose year has four digits; `None` otherwise.
    #[must_use]
    pub fn from_date(date: Date) -> Option<Self> {
        (0..=9999).contains(&date.year()).then_some(Self(date))
    }

    /// Canonical `YYYY-MM-DD` text.
    #[must_use]
    pub fn canonical(self) -> String {
        self.to_string()
    }
}

/// `DDDD-DD-DD` with ASCII digits; `time` alone would also take a signed year.
fn has_canonical_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, byte)| match i {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

impl FromStr for DueDate {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || InvalidDate {
            input: trimmed.to_owned(),
        };
        if !has_canonical_shape(trimmed) {
            return Err(invalid());
        }
        Date::parse(trimmed, CANONICAL).map(Self).map_err(|_| invalid())
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.format(CANONICAL).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for DueDate {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        if s.trim() != s {
            return Err(serde::de::Error::custom(format!(
                "due date `{s}` is not in canonical form"
            )));
        }
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn date(year: i32, month: Month, day: u8) -> DueDate {
        let date = Date::from_calendar_date(year, month, day)
            .unwrap_or_else(|err| panic!("valid calendar date: {err}"));
        DueDate::from_date(date).unwrap_or_else(|| panic!("{date} has a four digit year"))
    }

    #[test]
    fn blank_input_means_no_date() {
        assert_eq!(validate(""), Ok(None));
        assert_eq!(validate("   \t"), Ok(None));
    }

    #[test]
    fn valid_dates_are_canonical() {
        let Ok(Some(due)) = validate(" 2024-01-05 ") else {
            panic!("date should validate");
        };
        assert_eq!(due, date(2024, Month::January, 5));
        assert_eq!(due.canonical(), "2024-01-05");
    }

    #[test]
    fn impossible_dates_are_rejected() {
        for input in ["2024-01-32", "2023-02-29", "2024-13-01", "2024-00-10"] {
            assert!(validate(input).is_err(), "{input} must be rejected");
        }
        assert!(validate("2024-02-29").is_ok());
    }

    #[test]
    fn other_layouts_are_rejected() {
        for input in ["2024/01/05", "05-01-2024", "2024-1-5", "tomorrow", "2024-01-05T10:00"] {
            let Err(err) = validate(input) else {
                panic!("{input} must be rejected");
            };
            assert_eq!(err.input, input);
        }
    }

    #[test]
    fn signed_years_are_rejected() {
        for input in ["-0001-01-01", "+2024-01-05", "+002024-01-05", "-2024-01-05"] {
            let Err(err) = validate(input) else {
                panic!("{input} must be rejected");
            };
            assert_eq!(err.input, input);
        }
    }

    #[test]
    fn from_date_refuses_years_without_four_digits() {
        let Ok(early) = Date::from_calendar_date(-1, Month::January, 1) else {
            panic!("year -1 is within range");
        };
        assert!(DueDate::from_date(early).is_none());
        assert_eq!(date(1, Month::January, 2).canonical(), "0001-01-02");
    }

    #[test]
    fn canonical_text_reparses() {
        for input in ["0001-01-02", "2024-02-29", "9999-12-31"] {
            let Ok(Some(due)) = validate(input) else {
                panic!("{input} should validate");
            };
            assert_eq!(due.canonical(), input);
            assert_eq!(validate(&due.canonical()), Ok(Some(due)));
        }
    }

    #[test]
    fn dates_order_chronologically() {
        assert!(date(2024, Month::January, 5) < date(2024, Month::January, 10));
        assert!(date(2023, Month::December, 31) < date(2024, Month::January, 1));
    }

    #[test]
    fn serde_uses_canonical_text() -> Result<(), serde_json::Error> {
        let due = date(2024, Month::March, 9);
        assert_eq!(serde_json::to_string(&due)?, "\"2024-03-09\"");
        let parsed: DueDate = serde_json::from_str("\"2024-03-09\"")?;
        assert_eq!(parsed, due);
        assert!(serde_json::from_str::<DueDate>("\"2024-3-9\"").is_err());
        assert!(serde_json::from_str::<DueDate>("\" 2024-03-09\"").is_err());
        Ok(())
    }
}
