//! Numeric type check.
//!
//! Every column with at least one present value must have an integer or
//! floating-point dtype. Columns that are entirely missing carry no values
//! and pass whatever their dtype.

use polars::prelude::DataFrame;
use seg_common::{is_missing, is_numeric_dtype};

use crate::error::{Result, ValidationError};

/// Check that all present values are numeric.
pub fn check(df: &DataFrame) -> Result<()> {
    for column in df.get_columns() {
        if is_numeric_dtype(column.dtype()) {
            continue;
        }
        let mut has_values = false;
        for idx in 0..column.len() {
            if !is_missing(&column.get(idx)?) {
                has_values = true;
                break;
            }
        }
        if has_values {
            return Err(ValidationError::TypeIntegrity {
                column: column.name().to_string(),
                dtype: column.dtype().to_string(),
            });
        }
    }
    Ok(())
}
