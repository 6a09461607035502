//! Column lookup and typed access.

use polars::prelude::*;

use crate::error::{Result, TransformError};

pub(crate) fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| TransformError::ColumnNotFound {
        column: name.to_string(),
    })
}

pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Reads a numeric column as `f64` values; nulls stay `None`.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = require_column(df, name)?;
    if !is_numeric_dtype(column.dtype()) {
        return Err(TransformError::NotNumeric {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    let floats = column.cast(&DataType::Float64)?;
    Ok(floats.f64()?.iter().collect())
}

/// Reads a column as text; nulls stay `None`.
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = require_column(df, name)?;
    let text = column.cast(&DataType::String)?;
    Ok(text
        .str()?
        .iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

pub(crate) fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}
