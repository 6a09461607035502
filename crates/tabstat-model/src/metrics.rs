//! Column-level metrics.

/// `part / total * 100`, or `None` for an empty total.
pub fn percentage(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64 * 100.0)
    }
}

/// Null cells of one column against the unfiltered row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullSummary {
    pub column: String,
    pub total_rows: usize,
    pub nulls: usize,
}

impl NullSummary {
    pub fn percentage(&self) -> Option<f64> {
        percentage(self.nulls, self.total_rows)
    }
}

/// Ungrouped aggregates of a numeric column (nulls excluded).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub sum: f64,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    pub fn empty() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            mean: None,
            min: None,
            max: None,
        }
    }
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    /// Number of (x, y) pairs the line was fitted on.
    pub points: usize,
}
