//! Left outer joins with structural key inference.
//!
//! Keys are the columns both frames share. The output keeps every left row in
//! its original order; left rows without a match carry nulls in the right-hand
//! columns.

use std::collections::BTreeSet;

use polars::prelude::*;
use tracing::debug;

use crate::columns::require_column;
use crate::error::{Result, TransformError};

const LEFT_ROW: &str = "__tabstat_left_row";
const RIGHT_ROW: &str = "__tabstat_right_row";

/// Columns present in both frames, in left column order.
pub fn shared_columns(left: &DataFrame, right: &DataFrame) -> Vec<String> {
    left.get_column_names()
        .iter()
        .filter(|name| right.column(name.as_str()).is_ok())
        .map(|name| name.to_string())
        .collect()
}

/// Left-joins `right` onto `left` using every shared column as a key.
pub fn left_join(left: &DataFrame, right: &DataFrame) -> Result<DataFrame> {
    let keys = shared_columns(left, right);
    if keys.is_empty() {
        return Err(TransformError::NoSharedColumns);
    }
    left_join_on(left, right, &keys)
}

/// Left-joins on an explicit key list.
///
/// Non-key right columns whose names already exist on the left are renamed
/// `<name>_right` (`<name>_right2`, ... if that is taken too).
pub fn left_join_on(left: &DataFrame, right: &DataFrame, keys: &[String]) -> Result<DataFrame> {
    for key in keys {
        require_column(left, key)?;
        require_column(right, key)?;
    }
    let (left, right) = align_key_types(left, right, keys)?;
    let right = suffix_collisions(&left, &right, keys)?;

    let left_indexed = left.with_row_index(LEFT_ROW.into(), None)?;
    let right_indexed = right.with_row_index(RIGHT_ROW.into(), None)?;
    let on: Vec<Expr> = keys.iter().map(|key| col(key.as_str())).collect();

    let joined = left_indexed
        .lazy()
        .join(
            right_indexed.lazy(),
            on.clone(),
            on,
            JoinArgs::new(JoinType::Left),
        )
        .sort(
            [LEFT_ROW, RIGHT_ROW],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    debug!(
        keys = ?keys,
        left_rows = left.height(),
        right_rows = right.height(),
        rows = joined.height(),
        "left join"
    );

    Ok(joined.drop(LEFT_ROW)?.drop(RIGHT_ROW)?)
}

/// Folds [`left_join`] over `frames` in order.
pub fn chain_left_joins(frames: &[&DataFrame]) -> Result<DataFrame> {
    let (first, rest) = frames.split_first().ok_or(TransformError::EmptyJoinChain)?;
    let mut combined = (*first).clone();
    for frame in rest {
        combined = left_join(&combined, frame)?;
    }
    Ok(combined)
}

/// Casts key columns to text on both sides when their types differ.
fn align_key_types(
    left: &DataFrame,
    right: &DataFrame,
    keys: &[String],
) -> Result<(DataFrame, DataFrame)> {
    let mut left = left.clone();
    let mut right = right.clone();
    for key in keys {
        let left_type = left.column(key)?.dtype().clone();
        let right_type = right.column(key)?.dtype().clone();
        if left_type != right_type {
            let left_text = left.column(key)?.cast(&DataType::String)?;
            let right_text = right.column(key)?.cast(&DataType::String)?;
            left.with_column(left_text)?;
            right.with_column(right_text)?;
        }
    }
    Ok((left, right))
}

fn suffix_collisions(left: &DataFrame, right: &DataFrame, keys: &[String]) -> Result<DataFrame> {
    let mut taken: BTreeSet<String> = left
        .get_column_names()
        .iter()
        .chain(right.get_column_names().iter())
        .map(|name| name.to_string())
        .collect();
    let mut columns = Vec::with_capacity(right.width());
    for column in right.get_columns() {
        let name = column.name().to_string();
        let collides = !keys.contains(&name) && left.column(&name).is_ok();
        if !collides {
            columns.push(column.clone());
            continue;
        }
        let mut candidate = format!("{name}_right");
        let mut attempt = 2usize;
        while taken.contains(&candidate) {
            candidate = format!("{name}_right{attempt}");
            attempt += 1;
        }
        taken.insert(candidate.clone());
        columns.push(column.clone().with_name(candidate.into()));
    }
    Ok(DataFrame::new(columns)?)
}
