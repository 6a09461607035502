//! CSV header normalization.

use std::collections::BTreeSet;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Normalizes a header value by trimming whitespace and a UTF-8 BOM.
///
/// Inner whitespace is preserved, so `" Air Date"` becomes `"Air Date"`.
pub fn normalize_header(value: &str) -> String {
    value.trim_matches('\u{feff}').trim().to_string()
}

/// Returns a frame whose column names are normalized.
///
/// Fails when two headers collide after normalization.
pub fn normalize_headers(df: &DataFrame, source_name: &str) -> Result<DataFrame> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let normalized = normalize_header(column.name());
        if !seen.insert(normalized.clone()) {
            return Err(IngestError::DuplicateColumn {
                source_name: source_name.to_string(),
                column: normalized,
            });
        }
        columns.push(column.clone().with_name(normalized.into()));
    }
    Ok(DataFrame::new(columns)?)
}

/// Lists the `required` columns absent from `df`, in the order given.
pub fn missing_columns<'a>(df: &DataFrame, required: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut missing = Vec::new();
    for name in required {
        if df.column(name).is_err() && !missing.iter().any(|m: &String| m == name) {
            missing.push(name.to_string());
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(names: &[&str]) -> DataFrame {
        let columns: Vec<Column> = names
            .iter()
            .map(|name| Series::new((*name).into(), &["x"]).into_column())
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Air Date"), "Air Date");
        assert_eq!(normalize_header("\u{feff}user_id"), "user_id");
        assert_eq!(normalize_header("charges "), "charges");
    }

    #[test]
    fn test_normalize_headers_strips_leading_spaces() {
        let df = frame(&["Show Number", " Air Date", " Value"]);
        let normalized = normalize_headers(&df, "jeopardy.csv").unwrap();
        let names: Vec<String> = normalized
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["Show Number", "Air Date", "Value"]);
    }

    #[test]
    fn test_normalize_headers_rejects_collisions() {
        let df = frame(&["Value", " Value"]);
        let err = normalize_headers(&df, "jeopardy.csv").unwrap_err();
        assert!(matches!(err, IngestError::DuplicateColumn { ref column, .. } if column == "Value"));
    }

    #[test]
    fn test_missing_columns() {
        let df = frame(&["age", "sex"]);
        let missing = missing_columns(&df, ["age", "charges", "children", "charges"]);
        assert_eq!(missing, vec!["charges", "children"]);
    }
}
