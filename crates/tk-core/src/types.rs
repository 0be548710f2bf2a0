//! Core type definitions with validation.

use std::fmt;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The month was outside 1..=12.
    #[error("month must be between 1 and 12, got {value}")]
    MonthOutOfRange { value: i64 },

    /// The year was outside 1..=9999.
    #[error("year must be between 1 and 9999, got {value}")]
    YearOutOfRange { value: i64 },
}

/// A validated session label.
///
/// Labels are free text chosen by the user (a project or activity name).
/// Surrounding whitespace is trimmed; the remainder must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Creates a new label after validation.
    pub fn new(label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "label" });
        }
        if trimmed.len() == label.len() {
            Ok(Self(label))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Label {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Label {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A calendar month in the range \[1, 12\].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Month(u32);

impl Month {
    /// Creates a month after validation.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&value) {
            return Err(ValidationError::MonthOutOfRange {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// The current month on the local wall clock.
    pub fn current() -> Self {
        Self(Local::now().month())
    }

    /// Returns the month number.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Month {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u32 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A calendar year in the range \[1, 9999\].
///
/// The upper bound matches the four-digit years SQLite's `strftime('%Y')` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Year(i32);

impl Year {
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if !(1..=9999).contains(&value) {
            return Err(ValidationError::YearOutOfRange {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Year {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for i32 {
    fn from(year: Year) -> Self {
        year.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_rejects_empty_and_blank() {
        assert_eq!(
            Label::new(""),
            Err(ValidationError::Empty { field: "label" })
        );
        assert_eq!(
            Label::new("   \t"),
            Err(ValidationError::Empty { field: "label" })
        );
    }

    #[test]
    fn label_trims_surrounding_whitespace() {
        let label = Label::new("  writing ").unwrap();
        assert_eq!(label.as_str(), "writing");
        assert_eq!(label.to_string(), "writing");
    }

    #[test]
    fn label_keeps_inner_whitespace() {
        let label: Label = "deep work".parse().unwrap();
        assert_eq!(label.as_str(), "deep work");
    }

    #[test]
    fn label_deserialize_validates() {
        let ok: Label = serde_json::from_str(r#""work""#).unwrap();
        assert_eq!(ok.as_str(), "work");
        assert!(serde_json::from_str::<Label>(r#""""#).is_err());
    }

    #[test]
    fn month_accepts_full_range() {
        for value in 1..=12 {
            assert_eq!(Month::new(value).unwrap().value(), value);
        }
    }

    #[test]
    fn month_rejects_out_of_range() {
        assert_eq!(
            Month::new(0),
            Err(ValidationError::MonthOutOfRange { value: 0 })
        );
        assert_eq!(
            Month::new(13),
            Err(ValidationError::MonthOutOfRange { value: 13 })
        );
        assert!(Month::try_from(42_u32).is_err());
    }

    #[test]
    fn month_current_is_valid() {
        let month = Month::current();
        assert!(Month::new(month.value()).is_ok());
    }

    #[test]
    fn year_bounds() {
        assert!(Year::new(2025).is_ok());
        assert_eq!(
            Year::new(0),
            Err(ValidationError::YearOutOfRange { value: 0 })
        );
        assert_eq!(
            Year::new(10_000),
            Err(ValidationError::YearOutOfRange { value: 10_000 })
        );
    }

    #[test]
    fn year_display_is_four_digits() {
        assert_eq!(Year::new(987).unwrap().to_string(), "0987");
    }

    #[test]
    fn validation_error_messages() {
        assert_eq!(
            ValidationError::MonthOutOfRange { value: 13 }.to_string(),
            "month must be between 1 and 12, got 13"
        );
        assert_eq!(
            ValidationError::Empty { field: "label" }.to_string(),
            "label cannot be empty"
        );
    }
}
