//! Error types for cleaned-table validation.

use polars::prelude::PolarsError;
use thiserror::Error;

/// A structural property the cleaned table does not satisfy.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Column count differs from the replacement accounting.
    #[error("expected {expected} columns after cleaning, found {actual}")]
    SchemaIntegrity { expected: usize, actual: usize },

    /// Columns that cleaning should have removed are still present.
    #[error("dropped columns still present: {}", .columns.join(", "))]
    DroppedColumnsPresent { columns: Vec<String> },

    /// A row has more missing cells than allowed.
    #[error("row {row} has {missing} missing values, more than the cutoff of {cutoff}")]
    RowMissingCutoff {
        row: usize,
        missing: usize,
        cutoff: usize,
    },

    /// A column holds non-numeric values.
    #[error("column '{column}' has non-numeric dtype {dtype}")]
    TypeIntegrity { column: String, dtype: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for ValidationError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
