//! Decomposition of compound-coded columns.
//!
//! Two survey columns pack two attributes into one code:
//!
//! - the youth-cohort code (1..=15) combines the dominant movement of a
//!   person's youth with the decade of that youth;
//! - the international wealth / life-stage code (11..=55) holds the wealth
//!   category in its tens digit.
//!
//! Both are split into separate columns and then one-hot encoded.

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use seg_common::{any_to_string, integral_value, is_missing};
use seg_model::CleaningConfig;

use crate::encode::one_hot_encode;
use crate::error::{CleaningError, Result};
use crate::frame::{drop_columns, require_column};

/// Youth-cohort codes whose movement is avantgarde.
const AVANTGARDE_CODES: [i64; 8] = [2, 4, 6, 7, 9, 11, 13, 15];

/// Split a youth-cohort code into `(movement, decade)`.
///
/// Movement is 0 for avantgarde and 1 for mainstream. Decade runs from 0
/// (1940s) to 5 (1990s).
///
/// # Examples
///
/// ```
/// use seg_transform::decompose_youth_code;
///
/// assert_eq!(decompose_youth_code(Some(1)).unwrap(), Some((1, 0)));
/// assert_eq!(decompose_youth_code(Some(15)).unwrap(), Some((0, 5)));
/// assert_eq!(decompose_youth_code(None).unwrap(), None);
/// assert!(decompose_youth_code(Some(0)).is_err());
/// ```
pub fn decompose_youth_code(code: Option<i64>) -> Result<Option<(i64, i64)>> {
    let Some(code) = code else {
        return Ok(None);
    };
    let decade = match code {
        1 | 2 => 0,
        3 | 4 => 1,
        5..=7 => 2,
        8 | 9 => 3,
        10..=13 => 4,
        14 | 15 => 5,
        _ => {
            return Err(CleaningError::CodeOutOfRange {
                field: "youth cohort",
                value: code,
                min: 1,
                max: 15,
            });
        }
    };
    let movement = if AVANTGARDE_CODES.contains(&code) { 0 } else { 1 };
    Ok(Some((movement, decade)))
}

/// Split a wealth / life-stage code into `(wealth, life_stage)`.
///
/// Both parts are the code divided by ten, truncated.
pub fn decompose_wealth_lifestage_code(code: Option<i64>) -> Result<Option<(i64, i64)>> {
    let Some(code) = code else {
        return Ok(None);
    };
    if !(11..=55).contains(&code) {
        return Err(CleaningError::CodeOutOfRange {
            field: "wealth/life stage",
            value: code,
            min: 11,
            max: 55,
        });
    }
    let wealth = code / 10;
    let life_stage = code / 10;
    Ok(Some((wealth, life_stage)))
}

/// Replace the compound columns with their one-hot encoded parts and drop the
/// compound columns that are not decomposed.
pub fn decompose_mixed_features(table: &DataFrame, config: &CleaningConfig) -> Result<DataFrame> {
    let mixed = &config.mixed;

    let mut result = split_column(
        table,
        &mixed.youth_column,
        [mixed.movement_column.as_str(), mixed.decade_column.as_str()],
        decompose_youth_code,
    )?;
    result = split_column(
        &result,
        &mixed.wealth_lifestage_column,
        [mixed.wealth_column.as_str(), mixed.life_stage_column.as_str()],
        decompose_wealth_lifestage_code,
    )?;

    for entry in &mixed.derived_one_hot {
        result = one_hot_encode(&result, &entry.column, &entry.allowed)?;
    }

    drop_columns(&result, &mixed.dropped_columns)
}

/// Append the two parts of a compound column and drop the source.
fn split_column(
    table: &DataFrame,
    source: &str,
    targets: [&str; 2],
    decompose: fn(Option<i64>) -> Result<Option<(i64, i64)>>,
) -> Result<DataFrame> {
    let codes = read_integer_codes(require_column(table, source)?)?;

    let mut first = Vec::with_capacity(codes.len());
    let mut second = Vec::with_capacity(codes.len());
    for code in codes {
        let parts = decompose(code)?;
        first.push(parts.map(|(a, _)| a));
        second.push(parts.map(|(_, b)| b));
    }

    let mut result = table.clone();
    result.with_column(Series::new(targets[0].into(), first))?;
    result.with_column(Series::new(targets[1].into(), second))?;
    let result = result.drop(source)?;

    tracing::debug!(
        column = %source,
        first = %targets[0],
        second = %targets[1],
        "Decomposed compound column"
    );
    Ok(result)
}

fn read_integer_codes(column: &Column) -> Result<Vec<Option<i64>>> {
    let mut codes = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        let value = column.get(idx)?;
        if is_missing(&value) {
            codes.push(None);
            continue;
        }
        match integral_value(value.clone()) {
            Some(code) => codes.push(Some(code)),
            None => {
                return Err(CleaningError::NonIntegerCode {
                    column: column.name().to_string(),
                    value: any_to_string(value),
                });
            }
        }
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use polars::prelude::AnyValue;

    #[test]
    fn youth_code_table() {
        let expected = [
            (1, (1, 0)),
            (2, (0, 0)),
            (3, (1, 1)),
            (4, (0, 1)),
            (5, (1, 2)),
            (6, (0, 2)),
            (7, (0, 2)),
            (8, (1, 3)),
            (9, (0, 3)),
            (10, (1, 4)),
            (11, (0, 4)),
            (12, (1, 4)),
            (13, (0, 4)),
            (14, (1, 5)),
            (15, (0, 5)),
        ];
        for (code, parts) in expected {
            assert_eq!(decompose_youth_code(Some(code)).unwrap(), Some(parts), "{code}");
        }
        assert!(matches!(
            decompose_youth_code(Some(16)),
            Err(CleaningError::CodeOutOfRange { value: 16, .. })
        ));
    }

    #[test]
    fn wealth_code_boundaries() {
        assert_eq!(decompose_wealth_lifestage_code(Some(13)).unwrap(), Some((1, 1)));
        assert_eq!(decompose_wealth_lifestage_code(Some(54)).unwrap(), Some((5, 5)));
        assert_eq!(decompose_wealth_lifestage_code(None).unwrap(), None);
        assert!(decompose_wealth_lifestage_code(Some(10)).is_err());
        assert!(decompose_wealth_lifestage_code(Some(56)).is_err());
    }

    #[test]
    fn non_integer_code_is_rejected() {
        let df = df! { "PRAEGENDE_JUGENDJAHRE" => &[Some(1.0f64), Some(2.5)] }.unwrap();
        let err = read_integer_codes(df.column("PRAEGENDE_JUGENDJAHRE").unwrap()).unwrap_err();
        assert!(matches!(err, CleaningError::NonIntegerCode { ref value, .. } if value == "2.5"));
    }

    #[test]
    fn decomposes_and_encodes_mixed_columns() {
        let df = df! {
            "PRAEGENDE_JUGENDJAHRE" => &[Some(14i64), Some(2), None],
            "CAMEO_INTL_2015" => &[Some("51"), None, Some("24")],
            "LP_LEBENSPHASE_FEIN" => &[1i64, 2, 3],
            "LP_LEBENSPHASE_GROB" => &[1i64, 2, 3],
            "WOHNLAGE" => &[1i64, 2, 3],
            "PLZ8_BAUMAX" => &[1i64, 2, 3],
        }
        .unwrap();

        let result = decompose_mixed_features(&df, &CleaningConfig::default()).unwrap();

        // avantgarde + 6 decade + 5 wealth + 5 life stage
        assert_eq!(result.width(), 17);
        assert_eq!(result.get_column_names_str()[0], "avantgarde");
        let avantgarde = result.column("avantgarde").unwrap();
        assert_eq!(avantgarde.get(0).unwrap(), AnyValue::Int64(1));
        assert_eq!(avantgarde.get(1).unwrap(), AnyValue::Int64(0));
        assert!(avantgarde.get(2).unwrap().is_null());
        assert_eq!(
            result.column("decade_5").unwrap().get(0).unwrap(),
            AnyValue::Int64(1)
        );
        assert!(result.column("wealth_category_5").unwrap().get(1).unwrap().is_null());
        assert_eq!(
            result.column("life_stage_category_2").unwrap().get(2).unwrap(),
            AnyValue::Int64(1)
        );
    }
}
