//! Column accounting.
//!
//! The cleaned width is the raw width minus every dropped column plus the
//! columns derived from them.

use polars::prelude::DataFrame;
use seg_model::ValidationConfig;

use crate::error::{Result, ValidationError};

/// Check the column count against the replacement accounting.
pub fn check_count(df: &DataFrame, config: &ValidationConfig) -> Result<()> {
    let expected = config.expected_column_count();
    let actual = df.width();
    if actual != expected {
        return Err(ValidationError::SchemaIntegrity { expected, actual });
    }
    Ok(())
}

/// Check that no dropped column survived.
pub fn check_dropped(df: &DataFrame, config: &ValidationConfig) -> Result<()> {
    let present: Vec<String> = config
        .dropped_columns()
        .filter(|name| df.get_column_index(name).is_some())
        .map(str::to_string)
        .collect();
    if present.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::DroppedColumnsPresent { columns: present })
    }
}
