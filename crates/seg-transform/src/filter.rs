//! Column and row filtering.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use seg_model::CleaningConfig;

use crate::error::Result;
use crate::frame::drop_columns;

/// Drop the configured sparse/unreliable columns.
///
/// Every configured column must be present.
pub fn drop_outlier_columns(table: &DataFrame, config: &CleaningConfig) -> Result<DataFrame> {
    drop_columns(table, &config.outlier_columns)
}

/// Missing-cell count for each row.
pub fn missing_counts_by_row(table: &DataFrame) -> Result<Vec<usize>> {
    Ok(seg_common::missing_counts_by_row(table)?)
}

/// Keep rows with at most `cutoff` missing cells.
pub fn drop_sparse_rows(table: &DataFrame, cutoff: usize) -> Result<DataFrame> {
    let mask: Vec<bool> = missing_counts_by_row(table)?
        .into_iter()
        .map(|count| count <= cutoff)
        .collect();
    let keep = BooleanChunked::from_slice("keep".into(), &mask);
    let filtered = table.filter(&keep)?;
    tracing::debug!(
        cutoff,
        kept = filtered.height(),
        dropped = table.height() - filtered.height(),
        "Dropped sparse rows"
    );
    Ok(filtered)
}
