//! Sentinel replacement.
//!
//! Each survey column declares literal codes meaning "missing or unknown".
//! Those cells become nulls; every other cell keeps its value and the column
//! keeps its dtype family (Int64, Float64 or String).

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, Column, DataFrame, DataType, NamedFrom, Series};
use seg_common::{any_to_f64, any_to_string, integral_value, is_missing, parse_i64};
use seg_model::{CleaningConfig, SentinelValue};

use crate::error::{CleaningError, Result};

/// Replace every sentinel cell with null.
///
/// Every column of `table` must have an entry in `sentinel_map`, even an empty
/// one. Columns listed in [`CleaningConfig::integer_coerced_columns`] are then
/// converted to nullable Int64. The input table is not modified.
pub fn apply_sentinels(
    table: &DataFrame,
    sentinel_map: &BTreeMap<String, Vec<SentinelValue>>,
    config: &CleaningConfig,
) -> Result<DataFrame> {
    let uncovered: Vec<String> = table
        .get_column_names()
        .into_iter()
        .filter(|name| !sentinel_map.contains_key(name.as_str()))
        .map(|name| name.as_str().to_string())
        .collect();
    if !uncovered.is_empty() {
        return Err(CleaningError::SchemaMismatch { columns: uncovered });
    }

    let mut columns = Vec::with_capacity(table.width());
    for column in table.get_columns() {
        let name = column.name().as_str();
        let sentinels = sentinel_map
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut replaced = replace_sentinels(column, sentinels)?;
        if config.integer_coerced_columns.iter().any(|c| c == name) {
            replaced = coerce_to_integer(&replaced)?;
        }
        columns.push(replaced);
    }

    for name in &config.integer_coerced_columns {
        if table.get_column_index(name).is_none() {
            tracing::debug!(column = %name, "Integer coercion skipped, column absent");
        }
    }

    Ok(DataFrame::new(columns)?)
}

/// Returns true when `value` equals one of the sentinel codes.
///
/// Integer codes match integer cells, integral float cells and numeric
/// strings; text codes match trimmed string cells.
pub fn is_sentinel(value: &AnyValue<'_>, sentinels: &[SentinelValue]) -> bool {
    if is_missing(value) {
        return false;
    }
    let text = match value {
        AnyValue::String(s) => Some(*s),
        AnyValue::StringOwned(s) => Some(s.as_str()),
        _ => None,
    };
    sentinels.iter().any(|sentinel| match (sentinel, text) {
        (SentinelValue::Int(code), Some(s)) => parse_i64(s) == Some(*code),
        (SentinelValue::Int(code), None) => integral_value(value.clone()) == Some(*code),
        (SentinelValue::Text(code), Some(s)) => s.trim() == code,
        (SentinelValue::Text(_), None) => false,
    })
}

fn replace_sentinels(column: &Column, sentinels: &[SentinelValue]) -> Result<Column> {
    let name = column.name().clone();
    let dtype = column.dtype().clone();
    let mut replaced = 0usize;

    let series = if dtype.is_integer() {
        let mut values: Vec<Option<i64>> = Vec::with_capacity(column.len());
        for idx in 0..column.len() {
            let value = column.get(idx)?;
            if is_sentinel(&value, sentinels) {
                replaced += 1;
                values.push(None);
            } else if is_missing(&value) {
                values.push(None);
            } else {
                let Some(code) = integral_value(value.clone()) else {
                    return Err(CleaningError::IntegerCoercion {
                        column: name.to_string(),
                        value: any_to_string(value),
                    });
                };
                values.push(Some(code));
            }
        }
        Series::new(name, values)
    } else if dtype.is_float() {
        let mut values: Vec<Option<f64>> = Vec::with_capacity(column.len());
        for idx in 0..column.len() {
            let value = column.get(idx)?;
            if is_sentinel(&value, sentinels) {
                replaced += 1;
                values.push(None);
            } else {
                values.push(any_to_f64(value));
            }
        }
        Series::new(name, values)
    } else if dtype == DataType::String {
        let mut values: Vec<Option<String>> = Vec::with_capacity(column.len());
        for idx in 0..column.len() {
            let value = column.get(idx)?;
            if is_sentinel(&value, sentinels) {
                replaced += 1;
                values.push(None);
            } else if is_missing(&value) {
                values.push(None);
            } else {
                values.push(Some(any_to_string(value)));
            }
        }
        Series::new(name, values)
    } else {
        tracing::debug!(column = %column.name(), dtype = %dtype, "Sentinel replacement skipped for dtype");
        return Ok(column.clone());
    };

    if replaced > 0 {
        tracing::debug!(column = %column.name(), replaced, "Replaced sentinel values");
    }
    Ok(Column::from(series))
}

fn coerce_to_integer(column: &Column) -> Result<Column> {
    let mut values: Vec<Option<i64>> = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        let value = column.get(idx)?;
        if is_missing(&value) {
            values.push(None);
            continue;
        }
        match integral_value(value.clone()) {
            Some(v) => values.push(Some(v)),
            None => {
                return Err(CleaningError::IntegerCoercion {
                    column: column.name().to_string(),
                    value: any_to_string(value),
                });
            }
        }
    }
    tracing::debug!(column = %column.name(), "Coerced column to Int64");
    Ok(Column::from(Series::new(column.name().clone(), values)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn map(entries: &[(&str, Vec<SentinelValue>)]) -> BTreeMap<String, Vec<SentinelValue>> {
        entries
            .iter()
            .map(|(name, values)| ((*name).to_string(), values.clone()))
            .collect()
    }

    #[test]
    fn nulls_integer_sentinels_and_keeps_dtype() {
        let df = df! {
            "ALTERSKATEGORIE_GROB" => &[Some(-1i64), Some(2), Some(0), None, Some(9)],
        }
        .unwrap();
        let sentinels = map(&[(
            "ALTERSKATEGORIE_GROB",
            vec![SentinelValue::Int(-1), SentinelValue::Int(0), SentinelValue::Int(9)],
        )]);

        let result = apply_sentinels(&df, &sentinels, &CleaningConfig::default()).unwrap();
        let column = result.column("ALTERSKATEGORIE_GROB").unwrap();
        assert_eq!(column.dtype(), &DataType::Int64);
        assert_eq!(column.null_count(), 4);
        assert_eq!(column.get(1).unwrap(), AnyValue::Int64(2));
    }

    #[test]
    fn integer_values_outside_i64_are_rejected() {
        let df = df! { "ANZ_PERSONEN" => &[u64::MAX, 5u64] }.unwrap();
        let sentinels = map(&[("ANZ_PERSONEN", vec![SentinelValue::Int(-1)])]);

        let err = apply_sentinels(&df, &sentinels, &CleaningConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CleaningError::IntegerCoercion { ref column, ref value }
                if column == "ANZ_PERSONEN" && value == &u64::MAX.to_string()
        ));
    }

    #[test]
    fn unsigned_values_keep_their_codes() {
        let df = df! { "ANZ_PERSONEN" => &[Some(0u32), Some(3), None] }.unwrap();
        let sentinels = map(&[("ANZ_PERSONEN", vec![SentinelValue::Int(0)])]);

        let result = apply_sentinels(&df, &sentinels, &CleaningConfig::default()).unwrap();
        let column = result.column("ANZ_PERSONEN").unwrap();
        assert_eq!(column.dtype(), &DataType::Int64);
        assert_eq!(column.null_count(), 2);
        assert_eq!(column.get(1).unwrap(), AnyValue::Int64(3));
    }

    #[test]
    fn float_cells_match_integer_codes() {
        let df = df! { "KKK" => &[Some(0.0f64), Some(1.0), Some(2.5), None] }.unwrap();
        let sentinels = map(&[("KKK", vec![SentinelValue::Int(0)])]);

        let result = apply_sentinels(&df, &sentinels, &CleaningConfig::default()).unwrap();
        let column = result.column("KKK").unwrap();
        assert_eq!(column.dtype(), &DataType::Float64);
        assert!(column.get(0).unwrap().is_null());
        assert_eq!(column.get(2).unwrap(), AnyValue::Float64(2.5));
    }

    #[test]
    fn string_cells_match_text_and_integer_codes() {
        let df = df! { "CAMEO_INTL_2015" => &["51", "XX", "-1", "24"] }.unwrap();
        let sentinels = map(&[(
            "CAMEO_INTL_2015",
            vec![SentinelValue::Int(-1), SentinelValue::Text("XX".into())],
        )]);

        let result = apply_sentinels(&df, &sentinels, &CleaningConfig::default()).unwrap();
        let column = result.column("CAMEO_INTL_2015").unwrap();
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.null_count(), 2);
        assert_eq!(column.get(3).unwrap(), AnyValue::String("24"));
    }

    #[test]
    fn coerces_configured_columns_to_integer() {
        let df = df! { "CAMEO_DEUG_2015" => &["8", "X", "-1", "4"] }.unwrap();
        let sentinels = map(&[(
            "CAMEO_DEUG_2015",
            vec![SentinelValue::Int(-1), SentinelValue::Text("X".into())],
        )]);

        let result = apply_sentinels(&df, &sentinels, &CleaningConfig::default()).unwrap();
        let column = result.column("CAMEO_DEUG_2015").unwrap();
        assert_eq!(column.dtype(), &DataType::Int64);
        assert_eq!(column.get(0).unwrap(), AnyValue::Int64(8));
        assert_eq!(column.null_count(), 2);
    }

    #[test]
    fn coerced_columns_follow_configuration() {
        let df = df! {
            "CAMEO_DEUG_2015" => &["8", "X"],
            "CAMEO_INTL_2015" => &["51", "XX"],
        }
        .unwrap();
        let sentinels = map(&[
            ("CAMEO_DEUG_2015", vec![SentinelValue::Text("X".into())]),
            ("CAMEO_INTL_2015", vec![SentinelValue::Text("XX".into())]),
        ]);
        let config =
            CleaningConfig::default().with_integer_coerced_columns(vec!["CAMEO_INTL_2015".into()]);

        let result = apply_sentinels(&df, &sentinels, &config).unwrap();
        assert_eq!(result.column("CAMEO_DEUG_2015").unwrap().dtype(), &DataType::String);
        let intl = result.column("CAMEO_INTL_2015").unwrap();
        assert_eq!(intl.dtype(), &DataType::Int64);
        assert_eq!(intl.get(0).unwrap(), AnyValue::Int64(51));
    }

    #[test]
    fn coercion_rejects_leftover_text() {
        let df = df! { "CAMEO_DEUG_2015" => &["8", "Z"] }.unwrap();
        let sentinels = map(&[("CAMEO_DEUG_2015", vec![SentinelValue::Int(-1)])]);

        let err = apply_sentinels(&df, &sentinels, &CleaningConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CleaningError::IntegerCoercion { ref value, .. } if value == "Z"
        ));
    }

    #[test]
    fn uncovered_columns_are_all_listed() {
        let df = df! {
            "A" => &[1i64],
            "B" => &[1i64],
            "C" => &[1i64],
        }
        .unwrap();
        let sentinels = map(&[("B", vec![])]);

        let err = apply_sentinels(&df, &sentinels, &CleaningConfig::default()).unwrap_err();
        match err {
            CleaningError::SchemaMismatch { columns } => assert_eq!(columns, vec!["A", "C"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn is_sentinel_ignores_missing_cells() {
        let codes = [SentinelValue::Int(0)];
        assert!(!is_sentinel(&AnyValue::Null, &codes));
        assert!(is_sentinel(&AnyValue::Int32(0), &codes));
        assert!(is_sentinel(&AnyValue::String(" 0 "), &codes));
        assert!(!is_sentinel(&AnyValue::String("X"), &codes));
    }
}
