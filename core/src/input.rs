//! Parsing of caller-supplied values.
//!
//! Both front ends receive identifiers and page parameters as text (console
//! arguments, path segments, query strings). These helpers turn that text into
//! typed values and reject anything malformed before a store call is made.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Rejected caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A required value was not supplied.
    #[error("Missing {field}")]
    Missing {
        /// Name of the missing field
        field: &'static str,
    },

    /// The value is not an integer.
    #[error("Invalid {field}: expected an integer, got '{value}'")]
    NotAnInteger {
        /// Name of the offending field
        field: &'static str,
        /// The raw value
        value: String,
    },

    /// The value is not a decimal number.
    #[error("Invalid {field}: expected a number, got '{value}'")]
    NotANumber {
        /// Name of the offending field
        field: &'static str,
        /// The raw value
        value: String,
    },

    /// The value must be one or greater.
    #[error("Invalid {field}: must be at least 1")]
    NotPositive {
        /// Name of the offending field
        field: &'static str,
    },

    /// The export query type is not one of the known queries.
    #[error("Invalid queryType: '{0}'")]
    UnknownQueryType(String),
}

/// Parse an integer field.
///
/// # Errors
///
/// Returns [`InputError::NotAnInteger`] if `value` is not a base-10 `i32`.
pub fn parse_int(field: &'static str, value: &str) -> Result<i32, InputError> {
    value
        .trim()
        .parse()
        .map_err(|_| InputError::NotAnInteger {
            field,
            value: value.to_string(),
        })
}

/// Parse an integer field that must be at least one (identifiers, pages).
///
/// # Errors
///
/// Returns [`InputError::NotAnInteger`] or [`InputError::NotPositive`].
pub fn parse_positive(field: &'static str, value: &str) -> Result<i32, InputError> {
    let parsed = parse_int(field, value)?;
    if parsed < 1 {
        return Err(InputError::NotPositive { field });
    }
    Ok(parsed)
}

/// Parse a required positive field.
///
/// # Errors
///
/// Returns [`InputError::Missing`] when `value` is `None`, otherwise the
/// errors of [`parse_positive`].
pub fn required_positive(field: &'static str, value: Option<&str>) -> Result<i32, InputError> {
    value.map_or(Err(InputError::Missing { field }), |v| parse_positive(field, v))
}

/// Parse an optional positive field, falling back to `default`.
///
/// # Errors
///
/// Returns the errors of [`parse_positive`] when a value is present.
pub fn optional_positive(
    field: &'static str,
    value: Option<&str>,
    default: i32,
) -> Result<i32, InputError> {
    value.map_or(Ok(default), |v| parse_positive(field, v))
}

/// Parse a monetary threshold such as `1000` or `999.50`.
///
/// # Errors
///
/// Returns [`InputError::NotANumber`] if `value` is not a decimal number.
pub fn parse_amount(field: &'static str, value: &str) -> Result<Decimal, InputError> {
    Decimal::from_str(value.trim()).map_err(|_| InputError::NotANumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers_with_surrounding_whitespace() {
        assert_eq!(parse_int("userId", " 42 ").unwrap(), 42);
    }

    #[test]
    fn rejects_non_integers() {
        let err = parse_int("userId", "abc").unwrap_err();
        assert_eq!(err.to_string(), "Invalid userId: expected an integer, got 'abc'");
        assert!(parse_int("userId", "1.5").is_err());
    }

    #[test]
    fn positive_fields_reject_zero() {
        assert_eq!(
            parse_positive("page", "0").unwrap_err(),
            InputError::NotPositive { field: "page" }
        );
    }

    #[test]
    fn optional_fields_fall_back_to_default() {
        assert_eq!(optional_positive("pageSize", None, 5).unwrap(), 5);
        assert_eq!(optional_positive("pageSize", Some("7"), 5).unwrap(), 7);
        assert!(optional_positive("pageSize", Some("x"), 5).is_err());
    }

    #[test]
    fn required_fields_report_missing() {
        assert_eq!(
            required_positive("userId", None).unwrap_err(),
            InputError::Missing { field: "userId" }
        );
    }

    #[test]
    fn amounts_accept_fractions() {
        assert_eq!(parse_amount("value", "999.50").unwrap(), Decimal::new(99950, 2));
        assert!(parse_amount("value", "lots").is_err());
    }
}
