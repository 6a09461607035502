//! Dataset loading and validation.
//!
//! A [`LoadSpec`] names the columns a dataset must have, the key columns whose
//! missing values drop a row, and the columns to coerce to numbers. Rows
//! holding a value that cannot be coerced are excluded and counted in the
//! [`LoadReport`]; they are never turned into zeros. Text cells are trimmed
//! so category values compare the same way everywhere downstream.

use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info, info_span, warn};

use tabstat_common::is_null_token;

use crate::coerce::{NumericKind, coerce_value};
use crate::csv::{missing_columns, read_csv_frame};
use crate::error::{IngestError, Result};

/// A column to coerce to a numeric type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericColumn {
    pub source: String,
    /// Column receiving the coerced values; `None` replaces `source` in place.
    pub target: Option<String>,
    pub kind: NumericKind,
}

impl NumericColumn {
    pub fn float(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: None,
            kind: NumericKind::Float,
        }
    }

    pub fn integer(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: None,
            kind: NumericKind::Integer,
        }
    }

    /// Writes the coerced values to a new column, keeping the source text.
    #[must_use]
    pub fn into_column(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn target_name(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.source)
    }
}

/// Schema expectations for one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSpec {
    pub required: Vec<String>,
    pub keys: Vec<String>,
    pub numeric: Vec<NumericColumn>,
}

impl LoadSpec {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn require<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Rows with a missing value in any key column are dropped.
    #[must_use]
    pub fn keys<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(columns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn numeric(mut self, column: NumericColumn) -> Self {
        self.numeric.push(column);
        self
    }

    fn all_required(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .chain(self.keys.iter())
            .map(String::as_str)
            .chain(self.numeric.iter().map(|column| column.source.as_str()))
    }
}

/// Row accounting for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    /// Rows dropped for a missing key value.
    pub dropped_missing: usize,
    /// Rows excluded because a numeric column held a non-numeric value.
    pub dropped_uncoercible: usize,
    pub rows_kept: usize,
}

/// A validated dataset together with its load accounting.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub frame: DataFrame,
    pub report: LoadReport,
}

/// Loads `path` and applies `spec`.
///
/// # Errors
///
/// Returns a data-load error if the file is missing, unreadable or not valid
/// CSV, and a schema error if required columns are absent.
pub fn load_dataset(path: &Path, spec: &LoadSpec) -> Result<LoadedDataset> {
    let span = info_span!("load", path = %path.display());
    let _guard = span.enter();
    let raw = read_csv_frame(path)?;
    let source_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    prepare_frame(&raw, spec, &source_name)
}

/// Validates and coerces an already-loaded frame.
///
/// String columns are expected; other dtypes are cast to string first.
pub fn prepare_frame(df: &DataFrame, spec: &LoadSpec, source_name: &str) -> Result<LoadedDataset> {
    let missing = missing_columns(df, spec.all_required());
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            source_name: source_name.to_string(),
            columns: missing,
        });
    }
    let trimmed = trim_text_columns(df)?;
    let df = &trimmed;

    let height = df.height();
    let mut keep = vec![true; height];

    let mut dropped_missing = 0usize;
    for key in &spec.keys {
        let text = df.column(key)?.cast(&DataType::String)?;
        for (idx, value) in text.str()?.iter().enumerate() {
            let absent = value.is_none_or(is_null_token);
            if absent && keep[idx] {
                keep[idx] = false;
                dropped_missing += 1;
            }
        }
    }

    let mut dropped_uncoercible = 0usize;
    let mut coerced_columns = Vec::with_capacity(spec.numeric.len());
    for numeric in &spec.numeric {
        let text = df.column(&numeric.source)?.cast(&DataType::String)?;
        let mut values: Vec<Option<f64>> = Vec::with_capacity(height);
        let mut failures = 0usize;
        for (idx, raw) in text.str()?.iter().enumerate() {
            match coerce_value(&numeric.source, raw, numeric.kind) {
                Ok(value) => values.push(value),
                Err(err) => {
                    debug!(row = idx, error = %err, "excluding row");
                    failures += 1;
                    values.push(None);
                    if keep[idx] {
                        keep[idx] = false;
                        dropped_uncoercible += 1;
                    }
                }
            }
        }
        if failures > 0 {
            warn!(
                column = %numeric.source,
                failures,
                "values could not be converted to numbers"
            );
        }
        coerced_columns.push(numeric_series(numeric, values));
    }

    let mut frame = df.clone();
    for series in coerced_columns {
        frame.with_column(series)?;
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let frame = frame.filter(&mask)?;

    let report = LoadReport {
        rows_read: height,
        dropped_missing,
        dropped_uncoercible,
        rows_kept: frame.height(),
    };
    if report.dropped_missing > 0 || report.dropped_uncoercible > 0 {
        warn!(
            source = source_name,
            dropped_missing = report.dropped_missing,
            dropped_uncoercible = report.dropped_uncoercible,
            "rows excluded during load"
        );
    }
    info!(
        source = source_name,
        rows = report.rows_kept,
        columns = frame.width(),
        "dataset loaded"
    );

    Ok(LoadedDataset { frame, report })
}

/// Strips surrounding whitespace from every string cell.
fn trim_text_columns(df: &DataFrame) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        if column.dtype() == &DataType::String {
            let values: Vec<Option<&str>> =
                column.str()?.iter().map(|value| value.map(str::trim)).collect();
            columns.push(Series::new(column.name().clone(), values).into_column());
        } else {
            columns.push(column.clone());
        }
    }
    Ok(DataFrame::new(columns)?)
}

fn numeric_series(column: &NumericColumn, values: Vec<Option<f64>>) -> Series {
    let name = column.target_name();
    match column.kind {
        NumericKind::Float => Series::new(name.into(), values),
        NumericKind::Integer => {
            let ints: Vec<Option<i64>> = values.iter().map(|v| v.map(|v| v as i64)).collect();
            Series::new(name.into(), ints)
        }
    }
}
