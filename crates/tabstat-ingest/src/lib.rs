//! Dataset ingestion for the tabstat pipeline.
//!
//! This crate loads CSV files into Polars DataFrames and validates them
//! against a [`LoadSpec`].
//!
//! # Features
//!
//! - **CSV Loading**: every cell read as text, headers trimmed
//! - **Validation**: required columns, key columns with missing values dropped
//! - **Coercion**: numeric columns parsed with currency normalization; rows with
//!   unparseable values excluded and counted
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tabstat_ingest::{LoadSpec, NumericColumn, load_dataset};
//!
//! let spec = LoadSpec::new()
//!     .require(["age", "sex", "smoker"])
//!     .keys(["children", "charges"])
//!     .numeric(NumericColumn::integer("children"))
//!     .numeric(NumericColumn::float("charges"));
//! let loaded = load_dataset(Path::new("insurance.csv"), &spec)?;
//! println!("{} rows kept", loaded.report.rows_kept);
//! ```

mod coerce;
mod csv;
mod error;
mod loader;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{check_readable, missing_columns, normalize_header, normalize_headers, read_csv_frame};

// === Coercion ===
pub use coerce::{NumericKind, coerce_value};

// === Loading ===
pub use loader::{LoadReport, LoadSpec, LoadedDataset, NumericColumn, load_dataset, prepare_frame};
