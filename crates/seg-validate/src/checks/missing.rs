//! Row completeness.

use polars::prelude::DataFrame;
use seg_common::missing_counts_by_row;

use crate::error::{Result, ValidationError};

/// Fail on the first row with more than `cutoff` missing cells.
pub fn check(df: &DataFrame, cutoff: usize) -> Result<()> {
    let counts = missing_counts_by_row(df)?;
    match counts
        .into_iter()
        .enumerate()
        .find(|(_, missing)| *missing > cutoff)
    {
        Some((row, missing)) => Err(ValidationError::RowMissingCutoff {
            row,
            missing,
            cutoff,
        }),
        None => Ok(()),
    }
}
