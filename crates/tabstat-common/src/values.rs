//! Polars AnyValue utility functions.
//!
//! Group keys, aggregate results and sample rows all come back from Polars as
//! `AnyValue` cells; these helpers turn them into strings and floats.

use polars::prelude::*;

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`. Floats holding whole numbers render
/// without a fractional part.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use tabstat_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int64(3)), "3");
/// assert_eq!(any_to_string(AnyValue::String("male")), "male");
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
        AnyValue::Float32(v) => format_float(f64::from(v)),
        AnyValue::Float64(v) => format_float(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for non-numeric or null values.
///
/// String cells are parsed after trimming.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => crate::parse_f64(s),
        AnyValue::StringOwned(s) => crate::parse_f64(&s),
        _ => None,
    }
}

/// Reads one cell as a string; missing columns and out-of-range rows read as empty.
pub fn column_value_string(df: &DataFrame, column: &str, idx: usize) -> String {
    match df.column(column) {
        Ok(series) => series.get(idx).map(any_to_string).unwrap_or_default(),
        Err(_) => String::new(),
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
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(2.0)), "2");
        assert_eq!(any_to_string(AnyValue::Float64(1.25)), "1.25");
    }

    #[test]
    fn test_any_to_f64_integers_and_strings() {
        assert_eq!(any_to_f64(AnyValue::UInt32(7)), Some(7.0));
        assert_eq!(any_to_f64(AnyValue::String(" 3.5 ")), Some(3.5));
        assert_eq!(any_to_f64(AnyValue::String("abc")), None);
        assert_eq!(any_to_f64(AnyValue::Null), None);
    }

    #[test]
    fn test_column_value_string() {
        let df = DataFrame::new(vec![
            Series::new("sex".into(), &["male", "female"]).into_column(),
        ])
        .unwrap();
        assert_eq!(column_value_string(&df, "sex", 1), "female");
        assert_eq!(column_value_string(&df, "sex", 5), "");
        assert_eq!(column_value_string(&df, "missing", 0), "");
    }
}
