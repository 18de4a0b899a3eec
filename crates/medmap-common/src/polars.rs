//! Polars AnyValue utility functions.
//!
//! Source spreadsheets mix text and numeric cells in the same column, so every
//! stage reads cells through these helpers instead of matching on `AnyValue`.

use polars::prelude::AnyValue;

/// Literal text a missing cell becomes when a field is coerced to text.
///
/// Matches the textual form spreadsheet exports give to empty numeric cells, so
/// substitution rules authored against exported data keep matching.
pub const MISSING_TEXT: &str = "nan";

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null` and formats numeric types without
/// unnecessary trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use medmap_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::Float64(99213.0)), "99213");
/// assert_eq!(any_to_string(AnyValue::String("hello")), "hello");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Coerces a cell to text the way free-text rules see it.
///
/// Identical to [`any_to_string`] except that a missing cell becomes
/// [`MISSING_TEXT`] rather than an empty string.
///
/// ```
/// use polars::prelude::AnyValue;
/// use medmap_common::{MISSING_TEXT, any_to_text};
///
/// assert_eq!(any_to_text(AnyValue::Null), MISSING_TEXT);
/// assert_eq!(any_to_text(AnyValue::String("Aetna PPO")), "Aetna PPO");
/// ```
pub fn any_to_text(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => MISSING_TEXT.to_string(),
        other => any_to_string(other),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use medmap_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_integers() {
        assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
        assert_eq!(any_to_string(AnyValue::UInt32(0)), "0");
    }

    #[test]
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(1.5)), "1.5");
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
        assert_eq!(any_to_string(AnyValue::Float64(99213.0)), "99213");
        assert_eq!(any_to_string(AnyValue::Float64(100.0)), "100");
    }

    #[test]
    fn test_any_to_string_strings() {
        assert_eq!(any_to_string(AnyValue::String("hello")), "hello");
    }

    #[test]
    fn test_any_to_text_null_is_missing_literal() {
        assert_eq!(any_to_text(AnyValue::Null), "nan");
        assert_eq!(any_to_text(AnyValue::String("")), "");
        assert_eq!(any_to_text(AnyValue::Int64(7)), "7");
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(1.5), "1.5");
        assert_eq!(format_numeric(20.0), "20");
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(-2.25), "-2.25");
    }
}
