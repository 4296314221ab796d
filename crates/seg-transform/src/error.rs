//! Error types for demographic cleaning.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while resolving the schema or cleaning a survey table.
#[derive(Debug, Error)]
pub enum CleaningError {
    // === Schema Errors ===
    /// Missing-value spec is not a bracketed list.
    #[error("sentinel spec '{spec}' must be wrapped in '[' and ']'")]
    SentinelFormat { spec: String },

    /// The feature summary declares a column twice.
    #[error("column '{column}' is declared more than once in the feature summary")]
    DuplicateColumn { column: String },

    /// Table columns with no sentinel entry.
    #[error("columns without a missing/unknown entry: {}", .columns.join(", "))]
    SchemaMismatch { columns: Vec<String> },

    // === Value Errors ===
    /// Values outside a column's fixed code set.
    #[error("column '{column}' contains values outside the allowed set: {}", .values.join(", "))]
    UnexpectedValue { column: String, values: Vec<String> },

    /// A compound code outside its documented range.
    #[error("{field} code {value} is outside {min}..={max}")]
    CodeOutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A compound code cell that is not an integer.
    #[error("column '{column}' holds non-integer code '{value}'")]
    NonIntegerCode { column: String, value: String },

    /// A value left after sentinel replacement that cannot become an integer.
    #[error("column '{column}' value '{value}' cannot be coerced to an integer")]
    IntegerCoercion { column: String, value: String },

    // === DataFrame Errors ===
    /// Column not found in DataFrame.
    #[error("column '{column}' not found in DataFrame")]
    ColumnNotFound { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for CleaningError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;
