//! Small DataFrame helpers shared by the cleaning steps.

use polars::prelude::{Column, DataFrame};

use crate::error::{CleaningError, Result};

/// Look up a column, reporting a missing one as [`CleaningError::ColumnNotFound`].
pub(crate) fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| CleaningError::ColumnNotFound {
        column: name.to_string(),
    })
}

/// Drop every named column. All of them must exist.
pub(crate) fn drop_columns<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> Result<DataFrame> {
    let mut result = df.clone();
    for name in names {
        let name = name.as_ref();
        require_column(&result, name)?;
        result = result.drop(name)?;
        tracing::debug!(column = %name, "Dropped column");
    }
    Ok(result)
}

/// Names of the columns of a DataFrame, owned.
pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.as_str().to_string())
        .collect()
}
