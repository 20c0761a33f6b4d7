//! Column rules checked before any SQL is issued.

use super::{Decimal, Year};
use std::fmt;
use thiserror::Error;

/// A write rejected at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{table}.{column}: {kind}")]
pub struct ValidationError {
    pub table: &'static str,
    pub column: &'static str,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required value absent (empty string).
    Missing,
    /// Required value contains only whitespace.
    Blank,
    /// Longer than the column allows, in characters.
    TooLong { max: usize, actual: usize },
    OutOfRange { min: i64, max: i64, actual: i64 },
    Negative,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorKind::Missing => write!(f, "value is required"),
            ValidationErrorKind::Blank => write!(f, "value must not be blank"),
            ValidationErrorKind::TooLong { max, actual } => {
                write!(f, "{} characters exceeds the limit of {}", actual, max)
            }
            ValidationErrorKind::OutOfRange { min, max, actual } => {
                write!(f, "{} is outside {}..={}", actual, min, max)
            }
            ValidationErrorKind::Negative => write!(f, "value must not be negative"),
        }
    }
}

impl ValidationError {
    pub fn new(table: &'static str, column: &'static str, kind: ValidationErrorKind) -> Self {
        ValidationError {
            table,
            column,
            kind,
        }
    }
}

/// Check a non-nullable `varchar(max_chars)` column.
pub(crate) fn required_text(
    table: &'static str,
    column: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(
            table,
            column,
            ValidationErrorKind::Missing,
        ));
    }
    if value.trim().is_empty() {
        return Err(ValidationError::new(table, column, ValidationErrorKind::Blank));
    }
    let actual = value.chars().count();
    if actual > max_chars {
        return Err(ValidationError::new(
            table,
            column,
            ValidationErrorKind::TooLong {
                max: max_chars,
                actual,
            },
        ));
    }
    Ok(())
}

pub(crate) fn optional_year(
    table: &'static str,
    column: &'static str,
    value: Option<Year>,
) -> Result<(), ValidationError> {
    match value {
        Some(year) if !year.is_in_range() => Err(ValidationError::new(
            table,
            column,
            ValidationErrorKind::OutOfRange {
                min: i64::from(Year::MIN),
                max: i64::from(Year::MAX),
                actual: i64::from(year.as_i32()),
            },
        )),
        _ => Ok(()),
    }
}

/// Check an optional `int(11)` column that only makes sense when non-negative.
pub(crate) fn optional_count(
    table: &'static str,
    column: &'static str,
    value: Option<i64>,
) -> Result<(), ValidationError> {
    match value {
        Some(n) if !(0..=i64::from(i32::MAX)).contains(&n) => Err(ValidationError::new(
            table,
            column,
            ValidationErrorKind::OutOfRange {
                min: 0,
                max: i64::from(i32::MAX),
                actual: n,
            },
        )),
        _ => Ok(()),
    }
}

pub(crate) fn non_negative(
    table: &'static str,
    column: &'static str,
    value: &Decimal,
) -> Result<(), ValidationError> {
    if value.is_negative() {
        return Err(ValidationError::new(
            table,
            column,
            ValidationErrorKind::Negative,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_accepts_limit() {
        let value = "a".repeat(50);
        assert!(required_text("t", "c", &value, 50).is_ok());
    }

    #[test]
    fn test_required_text_counts_chars_not_bytes() {
        let value = "\u{00e9}".repeat(50);
        assert_eq!(value.len(), 100);
        assert!(required_text("t", "c", &value, 50).is_ok());
    }

    #[test]
    fn test_required_text_rejects_empty_and_blank() {
        let err = required_text("t", "c", "", 10).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Missing);

        let err = required_text("t", "c", " \t\n", 10).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Blank);
    }

    #[test]
    fn test_required_text_rejects_too_long() {
        let err = required_text("tab_authors", "last_name", &"x".repeat(76), 75).unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::TooLong {
                max: 75,
                actual: 76
            }
        );
        assert_eq!(
            err.to_string(),
            "tab_authors.last_name: 76 characters exceeds the limit of 75"
        );
    }

    #[test]
    fn test_optional_year() {
        assert!(optional_year("t", "c", None).is_ok());
        assert!(optional_year("t", "c", Some(Year::new(2001))).is_ok());
        assert!(optional_year("t", "c", Some(Year::new(1066))).is_err());
    }

    #[test]
    fn test_optional_count() {
        assert!(optional_count("t", "c", None).is_ok());
        assert!(optional_count("t", "c", Some(0)).is_ok());
        assert!(optional_count("t", "c", Some(-1)).is_err());
        assert!(optional_count("t", "c", Some(i64::from(i32::MAX) + 1)).is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative("t", "c", &Decimal::zero()).is_ok());
        let err = non_negative("t", "c", &Decimal::parse("-1").unwrap()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Negative);
    }
}
