//! Dataset transformations for the tabstat analyses.
//!
//! Every operation borrows a [`polars::prelude::DataFrame`] and returns a new
//! frame or a plain result type from `tabstat-model`:
//!
//! - [`join`]: left outer joins keyed on shared column names
//! - [`aggregate`]: group-by aggregation, null summaries and row filters
//! - [`derive`]: successive differences, percentage changes, subgroup comparisons
//! - [`keyword`]: whole-word keyword filtering and value frequencies
//! - [`time`]: timestamp parsing and elapsed-time columns

pub mod aggregate;
mod columns;
pub mod derive;
mod error;
pub mod join;
pub mod keyword;
pub mod time;

pub use aggregate::{
    column_stats, count_equals, filter_equals, filter_numeric, group_aggregate, null_summary,
};
pub use columns::{numeric_values, text_values};
pub use derive::{
    compare_groups, compare_subgroups, linear_trend, pct_change, ratio, successive_changes,
};
pub use error::{Result, TransformError};
pub use join::{chain_left_joins, left_join, left_join_on, shared_columns};
pub use keyword::{KeywordFilter, filter_by_keywords, value_frequencies};
pub use time::{add_elapsed_seconds, parse_timestamp};
