//! Numeric text normalization.

/// Cell text treated as missing during numeric coercion (compared case-insensitively).
const NULL_TOKENS: &[&str] = &["none", "na", "n/a", "null", "nan"];

/// Literal used by trivia datasets for clues without a dollar value.
const NO_VALUE: &str = "no value";

/// Returns true for empty cells and textual null markers such as `None` or `N/A`.
pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || NULL_TOKENS
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// Strips currency formatting from a raw cell.
///
/// Removes `$` and thousands separators, and maps `no value` to `0`.
/// Returns `None` when the cell is a null token.
///
/// # Examples
///
/// ```
/// use tabstat_common::normalize_amount;
///
/// assert_eq!(normalize_amount("$1,200").as_deref(), Some("1200"));
/// assert_eq!(normalize_amount("no value").as_deref(), Some("0"));
/// assert_eq!(normalize_amount("None"), None);
/// ```
pub fn normalize_amount(raw: &str) -> Option<String> {
    if is_null_token(raw) {
        return None;
    }
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(NO_VALUE) {
        return Some("0".to_string());
    }
    let cleaned: String = trimmed
        .chars()
        .filter(|ch| *ch != '$' && *ch != ',')
        .collect();
    Some(cleaned.trim().to_string())
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
///
/// Non-finite results (`inf`, `NaN`) are rejected.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}
