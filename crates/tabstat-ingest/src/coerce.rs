//! Numeric coercion of raw string cells.

use tabstat_common::{normalize_amount, parse_f64, parse_i64};

use crate::error::{IngestError, Result};

/// Target type of a coerced column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// 64-bit float; currency formatting is accepted.
    Float,
    /// 64-bit integer; values with a fractional part are rejected.
    Integer,
}

impl NumericKind {
    fn expected(self) -> &'static str {
        match self {
            Self::Float => "a number",
            Self::Integer => "an integer",
        }
    }
}

/// `2^63`; whole floats in `-2^63..2^63` fit an `i64`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Coerces a single cell.
///
/// Returns `Ok(None)` for null cells (absent, blank or a null token) and
/// `Err(IngestError::Coercion)` for present values that are not numbers.
/// Integer values outside the `i64` range are rejected.
pub fn coerce_value(column: &str, raw: Option<&str>, kind: NumericKind) -> Result<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let Some(normalized) = normalize_amount(raw) else {
        return Ok(None);
    };
    let failure = || IngestError::Coercion {
        column: column.to_string(),
        value: raw.trim().to_string(),
        expected: kind.expected(),
    };
    if kind == NumericKind::Integer
        && let Some(int) = parse_i64(&normalized)
    {
        return Ok(Some(int as f64));
    }
    let value = parse_f64(&normalized).ok_or_else(failure)?;
    let whole_i64 = value.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&value);
    match kind {
        NumericKind::Float => Ok(Some(value)),
        NumericKind::Integer if whole_i64 => Ok(Some(value)),
        NumericKind::Integer => Err(failure()),
    }
}
