//! Categorical re-encoding.
//!
//! One-hot encoding here differs from a plain dummy expansion: the category
//! sets are fixed per column rather than read from the data, and a missing
//! source cell yields null in every derived column instead of all zeros.

use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use seg_common::{any_to_string, integral_value, is_missing};
use seg_model::{BinaryRecode, CleaningConfig};

use crate::error::{CleaningError, Result};
use crate::frame::{drop_columns, require_column};

/// Run the categorical steps: drop high-cardinality columns, recode the binary
/// letter columns, then one-hot encode every configured column.
pub fn reencode_categoricals(table: &DataFrame, config: &CleaningConfig) -> Result<DataFrame> {
    let mut result = drop_columns(table, &config.high_cardinality_columns)?;
    for recode in &config.binary_recodes {
        result = recode_binary(&result, recode)?;
    }
    for entry in &config.one_hot_columns {
        result = one_hot_encode(&result, &entry.column, &entry.allowed)?;
    }
    Ok(result)
}

/// Recode a two-valued letter column to 0/1 in place.
///
/// Missing cells stay missing. Any code other than the two configured ones
/// is rejected.
pub fn recode_binary(table: &DataFrame, recode: &BinaryRecode) -> Result<DataFrame> {
    let column = require_column(table, &recode.column)?;
    let mut values: Vec<Option<i64>> = Vec::with_capacity(column.len());
    let mut unexpected = BTreeSet::new();

    for idx in 0..column.len() {
        let value = column.get(idx)?;
        if is_missing(&value) {
            values.push(None);
            continue;
        }
        let code = any_to_string(value);
        let code = code.trim();
        if code == recode.zero {
            values.push(Some(0));
        } else if code == recode.one {
            values.push(Some(1));
        } else {
            unexpected.insert(code.to_string());
            values.push(None);
        }
    }

    if !unexpected.is_empty() {
        return Err(CleaningError::UnexpectedValue {
            column: recode.column.clone(),
            values: unexpected.into_iter().collect(),
        });
    }

    let mut result = table.clone();
    result.with_column(Series::new(recode.column.as_str().into(), values))?;
    tracing::debug!(column = %recode.column, "Recoded binary column");
    Ok(result)
}

/// Expand a categorical column into one Int64 indicator column per allowed code.
///
/// New columns are named `{column}_{code}` and appended in the order of
/// `allowed`; the source column is dropped. A missing source cell gives null
/// in every new column. Values outside `allowed` are rejected.
pub fn one_hot_encode(table: &DataFrame, column: &str, allowed: &[i64]) -> Result<DataFrame> {
    let source = require_column(table, column)?;
    let codes = read_codes(source, allowed)?;

    let mut result = table.clone();
    for &category in allowed {
        let indicator: Vec<Option<i64>> = codes
            .iter()
            .map(|code| code.map(|c| i64::from(c == category)))
            .collect();
        let name = format!("{column}_{category}");
        result.with_column(Series::new(name.as_str().into(), indicator))?;
    }
    let result = result.drop(column)?;

    tracing::debug!(
        column = %column,
        categories = allowed.len(),
        "One-hot encoded column"
    );
    Ok(result)
}

fn read_codes(source: &Column, allowed: &[i64]) -> Result<Vec<Option<i64>>> {
    let mut codes = Vec::with_capacity(source.len());
    let mut unexpected = BTreeSet::new();

    for idx in 0..source.len() {
        let value = source.get(idx)?;
        if is_missing(&value) {
            codes.push(None);
            continue;
        }
        match integral_value(value.clone()) {
            Some(code) if allowed.contains(&code) => codes.push(Some(code)),
            _ => {
                unexpected.insert(any_to_string(value));
                codes.push(None);
            }
        }
    }

    if unexpected.is_empty() {
        Ok(codes)
    } else {
        Err(CleaningError::UnexpectedValue {
            column: source.name().to_string(),
            values: unexpected.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use polars::prelude::AnyValue;
    use seg_model::OneHotColumn;

    #[test]
    fn one_hot_propagates_missing() {
        let df = df! {
            "ANREDE_KZ" => &[1i64, 2, 1],
            "NATIONALITAET_KZ" => &[Some(1i64), None, Some(3)],
        }
        .unwrap();

        let result = one_hot_encode(&df, "NATIONALITAET_KZ", &[1, 2, 3]).unwrap();

        assert_eq!(
            result.get_column_names_str(),
            vec![
                "ANREDE_KZ",
                "NATIONALITAET_KZ_1",
                "NATIONALITAET_KZ_2",
                "NATIONALITAET_KZ_3"
            ]
        );
        for name in ["NATIONALITAET_KZ_1", "NATIONALITAET_KZ_2", "NATIONALITAET_KZ_3"] {
            assert!(result.column(name).unwrap().get(1).unwrap().is_null());
        }
        assert_eq!(
            result.column("NATIONALITAET_KZ_3").unwrap().get(2).unwrap(),
            AnyValue::Int64(1)
        );
        assert_eq!(
            result.column("NATIONALITAET_KZ_1").unwrap().get(2).unwrap(),
            AnyValue::Int64(0)
        );
    }

    #[test]
    fn one_hot_accepts_float_codes() {
        let df = df! { "GEBAEUDETYP" => &[Some(1.0f64), Some(8.0), None] }.unwrap();
        let result = one_hot_encode(&df, "GEBAEUDETYP", &[1, 3, 5, 8]).unwrap();
        assert_eq!(result.width(), 4);
        assert_eq!(
            result.column("GEBAEUDETYP_8").unwrap().get(1).unwrap(),
            AnyValue::Int64(1)
        );
    }

    #[test]
    fn one_hot_rejects_values_outside_allowed_set() {
        let df = df! { "SHOPPER_TYP" => &[0i64, 4, 7, 4] }.unwrap();
        let err = one_hot_encode(&df, "SHOPPER_TYP", &[0, 1, 2, 3]).unwrap_err();
        match err {
            CleaningError::UnexpectedValue { column, values } => {
                assert_eq!(column, "SHOPPER_TYP");
                assert_eq!(values, vec!["4", "7"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn binary_recode_maps_letters() {
        let df = df! { "OST_WEST_KZ" => &[Some("W"), Some("O"), None] }.unwrap();
        let recode = CleaningConfig::default().binary_recodes[0].clone();

        let result = recode_binary(&df, &recode).unwrap();
        let column = result.column("OST_WEST_KZ").unwrap();
        assert_eq!(column.get(0).unwrap(), AnyValue::Int64(0));
        assert_eq!(column.get(1).unwrap(), AnyValue::Int64(1));
        assert!(column.get(2).unwrap().is_null());
    }

    #[test]
    fn binary_recode_rejects_unknown_letter() {
        let df = df! { "OST_WEST_KZ" => &["W", "Q"] }.unwrap();
        let recode = CleaningConfig::default().binary_recodes[0].clone();
        assert!(matches!(
            recode_binary(&df, &recode),
            Err(CleaningError::UnexpectedValue { .. })
        ));
    }

    #[test]
    fn reencode_runs_all_steps() {
        let df = df! {
            "CAMEO_DEU_2015" => &["8A", "4C"],
            "OST_WEST_KZ" => &["O", "W"],
            "FINANZTYP" => &[1i64, 6],
            "KEEP" => &[5i64, 5],
        }
        .unwrap();
        let config = CleaningConfig::default()
            .with_one_hot_columns(vec![OneHotColumn::new("FINANZTYP", [1, 6])]);

        let result = reencode_categoricals(&df, &config).unwrap();

        assert_eq!(
            result.get_column_names_str(),
            vec!["OST_WEST_KZ", "KEEP", "FINANZTYP_1", "FINANZTYP_6"]
        );
    }
}
