//! Shared utilities for tabstat crates.
//!
//! This crate provides helpers used across the workspace: conversions from
//! Polars `AnyValue` cells and normalization of raw numeric text such as
//! `"$1,200"` or `"no value"`.

pub mod numbers;
pub mod values;

// Re-export commonly used functions at crate root for convenience
pub use numbers::{is_null_token, normalize_amount, parse_f64, parse_i64};
pub use values::{any_to_f64, any_to_string, column_value_string};
