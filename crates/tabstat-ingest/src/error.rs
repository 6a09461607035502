//! Error types for dataset loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and validating a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Data Load Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    // === Schema Errors ===
    /// Required columns are absent after header normalization.
    #[error("missing required columns [{}] in {source_name}", columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },

    /// Two headers normalize to the same name.
    #[error("duplicate column '{column}' in {source_name}")]
    DuplicateColumn { source_name: String, column: String },

    // === Coercion Errors ===
    /// A present value could not be converted to the expected numeric type.
    #[error("column '{column}': cannot convert '{value}' to {expected}")]
    Coercion {
        column: String,
        value: String,
        expected: &'static str,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    /// True for failures to open, read or parse the input file.
    pub fn is_data_load(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::FileRead { .. }
                | Self::CsvParse { .. }
                | Self::EmptyCsv { .. }
        )
    }

    /// True for header/column problems.
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            Self::MissingColumns { .. } | Self::DuplicateColumn { .. }
        )
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/insurance.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /data/insurance.csv");
        assert!(err.is_data_load());
    }

    #[test]
    fn test_missing_columns_display() {
        let err = IngestError::MissingColumns {
            source_name: "insurance.csv".to_string(),
            columns: vec!["children".to_string(), "charges".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required columns [children, charges] in insurance.csv"
        );
        assert!(err.is_schema());
        assert!(!err.is_data_load());
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
