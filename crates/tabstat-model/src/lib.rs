pub mod group;
pub mod metrics;

pub use group::{GroupChange, GroupComparison, GroupStats, GroupSummary};
pub use metrics::{ColumnStats, LinearTrend, NullSummary, percentage};
