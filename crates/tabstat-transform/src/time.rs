//! Timestamp parsing and elapsed-time columns.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::columns::{require_column, text_values};
use crate::error::Result;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a timestamp in one of the accepted ISO-like layouts.
///
/// A bare date is taken as midnight. Blank or unrecognised input is `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Adds `target` holding the seconds elapsed from `start` to `end`.
///
/// Rows where either timestamp is null or unparseable get a null.
pub fn add_elapsed_seconds(
    df: &DataFrame,
    start: &str,
    end: &str,
    target: &str,
) -> Result<DataFrame> {
    require_column(df, start)?;
    require_column(df, end)?;
    let starts = text_values(df, start)?;
    let ends = text_values(df, end)?;

    let elapsed: Vec<Option<f64>> = starts
        .iter()
        .zip(&ends)
        .map(|(from, to)| {
            let from = parse_timestamp(from.as_deref()?)?;
            let to = parse_timestamp(to.as_deref()?)?;
            Some((to - from).num_milliseconds() as f64 / 1000.0)
        })
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new(target.into(), elapsed).into_column())?;
    Ok(out)
}
