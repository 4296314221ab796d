//! Cleaned-table validation.

use polars::prelude::DataFrame;
use seg_model::ValidationConfig;

use crate::checks::{columns, datatype, missing};
use crate::error::Result;

/// Validate a cleaned feature table.
///
/// Checks run in order and the first failure is returned:
/// 1. column count matches the replacement accounting;
/// 2. none of the dropped columns remain;
/// 3. no row exceeds the missing-value cutoff;
/// 4. every present value is numeric.
pub fn validate_cleaned(df: &DataFrame, config: &ValidationConfig) -> Result<()> {
    columns::check_count(df, config)?;
    columns::check_dropped(df, config)?;
    missing::check(df, config.row_missing_cutoff)?;
    datatype::check(df)?;

    tracing::info!(
        rows = df.height(),
        columns = df.width(),
        "Cleaned table passed validation"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use polars::df;
    use std::collections::BTreeMap;

    fn config() -> ValidationConfig {
        ValidationConfig {
            original_column_count: 4,
            replacements: BTreeMap::from([("DROPPED".to_string(), 0), ("CAT".to_string(), 2)]),
            row_missing_cutoff: 0,
        }
    }

    #[test]
    fn accepts_clean_table() {
        let df = df! {
            "A" => &[1i64, 2],
            "B" => &[0.5f64, 1.5],
            "CAT_1" => &[1i64, 0],
            "CAT_2" => &[0i64, 1],
        }
        .unwrap();
        validate_cleaned(&df, &config()).unwrap();
    }

    #[test]
    fn rejects_wrong_width() {
        let df = df! { "A" => &[1i64] }.unwrap();
        assert!(matches!(
            validate_cleaned(&df, &config()),
            Err(ValidationError::SchemaIntegrity {
                expected: 4,
                actual: 1
            })
        ));
    }

    #[test]
    fn rejects_surviving_dropped_column() {
        let df = df! {
            "A" => &[1i64],
            "DROPPED" => &[1i64],
            "CAT_1" => &[1i64],
            "CAT_2" => &[0i64],
        }
        .unwrap();
        let err = validate_cleaned(&df, &config()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::DroppedColumnsPresent { ref columns } if columns == &["DROPPED"]
        ));
    }

    #[test]
    fn rejects_row_over_cutoff() {
        let df = df! {
            "A" => &[Some(1i64), None],
            "B" => &[Some(1.0f64), Some(f64::NAN)],
            "CAT_1" => &[1i64, 0],
            "CAT_2" => &[0i64, 1],
        }
        .unwrap();
        assert!(matches!(
            validate_cleaned(&df, &config()),
            Err(ValidationError::RowMissingCutoff {
                row: 1,
                missing: 2,
                cutoff: 0
            })
        ));
        let relaxed = config().with_row_missing_cutoff(2);
        validate_cleaned(&df, &relaxed).unwrap();
    }

    #[test]
    fn rejects_text_column() {
        let df = df! {
            "A" => &[1i64],
            "B" => &["W"],
            "CAT_1" => &[1i64],
            "CAT_2" => &[0i64],
        }
        .unwrap();
        assert!(matches!(
            validate_cleaned(&df, &config()),
            Err(ValidationError::TypeIntegrity { ref column, .. }) if column == "B"
        ));
    }

    #[test]
    fn all_missing_text_column_passes_type_check() {
        let df = df! {
            "A" => &[1i64],
            "B" => &[None::<&str>],
            "CAT_1" => &[1i64],
            "CAT_2" => &[0i64],
        }
        .unwrap();
        datatype::check(&df).unwrap();
    }
}
