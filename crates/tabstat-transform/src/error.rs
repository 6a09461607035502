//! Error types for transformations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    #[error("column '{column}' is not numeric (found {dtype})")]
    NotNumeric { column: String, dtype: String },

    #[error("datasets share no columns to join on")]
    NoSharedColumns,

    #[error("join chain needs at least one dataset")]
    EmptyJoinChain,

    /// A metric with no defined value, e.g. a percentage change from zero.
    #[error("undefined metric: {reason}")]
    UndefinedMetric { reason: String },

    #[error("invalid keyword '{word}': {message}")]
    InvalidKeyword { word: String, message: String },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
