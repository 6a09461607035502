//! Grouped aggregation results.

use crate::metrics::percentage;

/// Aggregates of a numeric target column within one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    /// Group key rendered as text (`"0"`, `"male"`, `"yes"`).
    pub key: String,
    /// All rows carrying this key, including rows with a null target.
    pub rows: usize,
    /// Rows with a non-null target value.
    pub count: usize,
    /// Rows with a null target value.
    pub nulls: usize,
    pub sum: f64,
    /// `None` when the group has no non-null target values.
    pub mean: Option<f64>,
}

impl GroupStats {
    /// Null target rows as a percentage of all rows in the group.
    pub fn null_percentage(&self) -> Option<f64> {
        percentage(self.nulls, self.rows)
    }
}

/// Per-group aggregates, ordered by group key ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group_column: String,
    pub target_column: String,
    pub groups: Vec<GroupStats>,
}

impl GroupSummary {
    pub fn get(&self, key: &str) -> Option<&GroupStats> {
        self.groups.iter().find(|group| group.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|group| group.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rows across all groups (rows with a null group key are not counted).
    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(|group| group.rows).sum()
    }

    /// Mean of the group means weighted by each group's non-null count.
    ///
    /// Equal to the ungrouped mean of the target column.
    pub fn weighted_mean(&self) -> Option<f64> {
        let count: usize = self.groups.iter().map(|group| group.count).sum();
        if count == 0 {
            return None;
        }
        let weighted: f64 = self
            .groups
            .iter()
            .filter_map(|group| Some(group.mean? * group.count as f64))
            .sum();
        Some(weighted / count as f64)
    }
}

/// Change of a group's mean relative to the previous group in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupChange {
    pub key: String,
    pub mean: Option<f64>,
    /// `mean_i - mean_{i-1}`; `None` for the first group or a missing mean.
    pub diff_prev: Option<f64>,
    /// Percentage change from the previous mean; `None` when undefined.
    pub pct_change: Option<f64>,
}

/// Signed comparison of two named subgroups (`left - right`).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupComparison {
    pub left: String,
    pub right: String,
    pub left_stats: Option<GroupStats>,
    pub right_stats: Option<GroupStats>,
}

impl GroupComparison {
    /// Difference of target totals, `None` if either subgroup is absent.
    pub fn total_diff(&self) -> Option<f64> {
        match (&self.left_stats, &self.right_stats) {
            (Some(left), Some(right)) => Some(left.sum - right.sum),
            _ => None,
        }
    }

    /// Difference of target means, `None` if either mean is undefined.
    pub fn mean_diff(&self) -> Option<f64> {
        let left = self.left_stats.as_ref()?.mean?;
        let right = self.right_stats.as_ref()?.mean?;
        Some(left - right)
    }

    /// Difference of row counts, `None` if either subgroup is absent.
    pub fn count_diff(&self) -> Option<i64> {
        let left = self.left_stats.as_ref()?.rows as i64;
        let right = self.right_stats.as_ref()?.rows as i64;
        Some(left - right)
    }
}
