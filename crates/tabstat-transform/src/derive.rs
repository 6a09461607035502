//! Metrics derived from grouped aggregates.

use polars::prelude::DataFrame;

use tabstat_model::{GroupChange, GroupComparison, GroupSummary, LinearTrend};

use crate::aggregate::group_aggregate;
use crate::columns::numeric_values;
use crate::error::{Result, TransformError};

/// Percentage change from `previous` to `current`.
///
/// # Errors
///
/// Returns [`TransformError::UndefinedMetric`] when `previous` is zero or
/// either value is not finite.
pub fn pct_change(previous: f64, current: f64) -> Result<f64> {
    if !previous.is_finite() || !current.is_finite() {
        return Err(TransformError::UndefinedMetric {
            reason: "percentage change of a non-finite value".to_string(),
        });
    }
    if previous == 0.0 {
        return Err(TransformError::UndefinedMetric {
            reason: "percentage change from zero".to_string(),
        });
    }
    Ok((current - previous) / previous * 100.0)
}

/// Difference and percentage change of each group's mean from the previous group.
pub fn successive_changes(summary: &GroupSummary) -> Vec<GroupChange> {
    let mut changes = Vec::with_capacity(summary.len());
    let mut previous: Option<f64> = None;
    for (idx, group) in summary.groups.iter().enumerate() {
        let (diff_prev, pct) = match (idx, previous, group.mean) {
            (0, _, _) => (None, None),
            (_, Some(prev), Some(mean)) => (Some(mean - prev), pct_change(prev, mean).ok()),
            _ => (None, None),
        };
        changes.push(GroupChange {
            key: group.key.clone(),
            mean: group.mean,
            diff_prev,
            pct_change: pct,
        });
        previous = group.mean;
    }
    changes
}

/// Picks two named groups out of a summary for a `left - right` comparison.
pub fn compare_groups(summary: &GroupSummary, left: &str, right: &str) -> GroupComparison {
    GroupComparison {
        left: left.to_string(),
        right: right.to_string(),
        left_stats: summary.get(left).cloned(),
        right_stats: summary.get(right).cloned(),
    }
}

/// Groups `df` by `group_column`, aggregates `target` and compares two subgroups.
pub fn compare_subgroups(
    df: &DataFrame,
    group_column: &str,
    target: &str,
    left: &str,
    right: &str,
) -> Result<GroupComparison> {
    let summary = group_aggregate(df, group_column, target)?;
    Ok(compare_groups(&summary, left, right))
}

/// `numerator / denominator`, `None` for a zero denominator.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Ordinary least-squares fit of `y` on `x` over rows where both are present.
///
/// Returns `None` when fewer than two distinct `x` values exist.
pub fn linear_trend(df: &DataFrame, x: &str, y: &str) -> Result<Option<LinearTrend>> {
    let xs = numeric_values(df, x)?;
    let ys = numeric_values(df, y)?;
    let points: Vec<(f64, f64)> = xs
        .into_iter()
        .zip(ys)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();
    if points.len() < 2 {
        return Ok(None);
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in &points {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx == 0.0 {
        return Ok(None);
    }
    let slope = sxy / sxx;
    Ok(Some(LinearTrend {
        slope,
        intercept: mean_y - slope * mean_x,
        points: points.len(),
    }))
}
