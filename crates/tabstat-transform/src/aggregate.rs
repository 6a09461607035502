//! Grouped and ungrouped aggregation.

use polars::prelude::*;

use tabstat_common::{any_to_f64, any_to_string};
use tabstat_model::{ColumnStats, GroupStats, GroupSummary, NullSummary};

use crate::columns::{filter_rows, is_numeric_dtype, numeric_values, require_column, text_values};
use crate::error::{Result, TransformError};

const ROWS: &str = "__rows";
const COUNT: &str = "__count";
const SUM: &str = "__sum";
const MEAN: &str = "__mean";

/// Groups `df` by `group_column` and aggregates the numeric `target` column.
///
/// Per group: all rows, non-null target count, null count, sum and mean of
/// the target. Rows whose group key is null are left out; groups are sorted
/// by key.
pub fn group_aggregate(df: &DataFrame, group_column: &str, target: &str) -> Result<GroupSummary> {
    require_column(df, group_column)?;
    let target_column = require_column(df, target)?;
    if !is_numeric_dtype(target_column.dtype()) {
        return Err(TransformError::NotNumeric {
            column: target.to_string(),
            dtype: target_column.dtype().to_string(),
        });
    }

    let grouped = df
        .clone()
        .lazy()
        .filter(col(group_column).is_not_null())
        .group_by([col(group_column)])
        .agg([
            len().alias(ROWS),
            col(target).count().alias(COUNT),
            col(target).cast(DataType::Float64).sum().alias(SUM),
            col(target).cast(DataType::Float64).mean().alias(MEAN),
        ])
        .sort([group_column], SortMultipleOptions::default())
        .collect()?;

    let keys = grouped.column(group_column)?;
    let rows = grouped.column(ROWS)?;
    let counts = grouped.column(COUNT)?;
    let sums = grouped.column(SUM)?;
    let means = grouped.column(MEAN)?;

    let mut groups = Vec::with_capacity(grouped.height());
    for idx in 0..grouped.height() {
        let row_count = any_to_f64(rows.get(idx)?).unwrap_or(0.0) as usize;
        let count = any_to_f64(counts.get(idx)?).unwrap_or(0.0) as usize;
        groups.push(GroupStats {
            key: any_to_string(keys.get(idx)?),
            rows: row_count,
            count,
            nulls: row_count.saturating_sub(count),
            sum: any_to_f64(sums.get(idx)?).unwrap_or(0.0),
            mean: if count == 0 {
                None
            } else {
                any_to_f64(means.get(idx)?)
            },
        });
    }

    Ok(GroupSummary {
        group_column: group_column.to_string(),
        target_column: target.to_string(),
        groups,
    })
}

/// Null cells of `column` against the full row count of `df`.
pub fn null_summary(df: &DataFrame, column: &str) -> Result<NullSummary> {
    let series = require_column(df, column)?;
    Ok(NullSummary {
        column: column.to_string(),
        total_rows: df.height(),
        nulls: series.null_count(),
    })
}

/// Count, sum, mean, min and max of a numeric column, ignoring nulls.
pub fn column_stats(df: &DataFrame, column: &str) -> Result<ColumnStats> {
    let values: Vec<f64> = numeric_values(df, column)?.into_iter().flatten().collect();
    if values.is_empty() {
        return Ok(ColumnStats::empty());
    }
    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(ColumnStats {
        count: values.len(),
        sum,
        mean: Some(sum / values.len() as f64),
        min: Some(min),
        max: Some(max),
    })
}

/// Rows whose `column` equals `value` as text, matched exactly like the keys
/// of [`group_aggregate`].
pub fn filter_equals(df: &DataFrame, column: &str, value: &str) -> Result<DataFrame> {
    let keep: Vec<bool> = text_values(df, column)?
        .iter()
        .map(|cell| cell.as_deref() == Some(value))
        .collect();
    filter_rows(df, &keep)
}

/// Rows whose numeric `column` satisfies `predicate`; null cells never match.
pub fn filter_numeric(
    df: &DataFrame,
    column: &str,
    predicate: impl Fn(f64) -> bool,
) -> Result<DataFrame> {
    let keep: Vec<bool> = numeric_values(df, column)?
        .iter()
        .map(|cell| cell.is_some_and(&predicate))
        .collect();
    filter_rows(df, &keep)
}

/// Number of rows whose `column` equals `value`.
pub fn count_equals(df: &DataFrame, column: &str, value: &str) -> Result<usize> {
    Ok(filter_equals(df, column, value)?.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insurance_df() -> DataFrame {
        DataFrame::new(vec![
            Series::new("sex".into(), &["male", "female", "male", "female", "male"]).into_column(),
            Series::new("children".into(), &[0i64, 1, 0, 2, 1]).into_column(),
            Series::new(
                "charges".into(),
                &[Some(100.0), Some(200.0), None, Some(400.0), Some(50.0)],
            )
            .into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn test_group_aggregate_by_children() {
        let summary = group_aggregate(&insurance_df(), "children", "charges").unwrap();

        assert_eq!(summary.keys(), vec!["0", "1", "2"]);
        let zero = summary.get("0").unwrap();
        assert_eq!(zero.rows, 2);
        assert_eq!(zero.count, 1);
        assert_eq!(zero.nulls, 1);
        assert_eq!(zero.sum, 100.0);
        assert_eq!(zero.mean, Some(100.0));
        assert_eq!(zero.null_percentage(), Some(50.0));

        let one = summary.get("1").unwrap();
        assert_eq!(one.sum, 250.0);
        assert_eq!(one.mean, Some(125.0));
    }

    #[test]
    fn test_group_aggregate_by_text_key_sorted() {
        let summary = group_aggregate(&insurance_df(), "sex", "charges").unwrap();
        assert_eq!(summary.keys(), vec!["female", "male"]);
        assert_eq!(summary.get("female").unwrap().sum, 600.0);
        assert_eq!(summary.total_rows(), 5);
    }

    #[test]
    fn test_group_aggregate_rejects_text_target() {
        let err = group_aggregate(&insurance_df(), "children", "sex").unwrap_err();
        assert!(matches!(err, TransformError::NotNumeric { .. }));
    }

    #[test]
    fn test_group_aggregate_missing_column() {
        let err = group_aggregate(&insurance_df(), "region", "charges").unwrap_err();
        assert!(matches!(err, TransformError::ColumnNotFound { ref column } if column == "region"));
    }

    #[test]
    fn test_null_summary_counts_nulls_not_size() {
        let summary = null_summary(&insurance_df(), "charges").unwrap();
        assert_eq!(summary.total_rows, 5);
        assert_eq!(summary.nulls, 1);
        assert_eq!(summary.percentage(), Some(20.0));
    }

    #[test]
    fn test_column_stats() {
        let stats = column_stats(&insurance_df(), "charges").unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.sum, 750.0);
        assert_eq!(stats.mean, Some(187.5));
        assert_eq!(stats.min, Some(50.0));
        assert_eq!(stats.max, Some(400.0));
    }

    #[test]
    fn test_filters() {
        let df = insurance_df();
        assert_eq!(filter_equals(&df, "sex", "male").unwrap().height(), 3);
        assert_eq!(count_equals(&df, "sex", "female").unwrap(), 2);
        assert_eq!(filter_numeric(&df, "children", |c| c > 0.0).unwrap().height(), 3);
        assert_eq!(filter_numeric(&df, "charges", |c| c > 0.0).unwrap().height(), 4);
    }
}
