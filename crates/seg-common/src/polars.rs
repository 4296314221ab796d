//! Polars AnyValue utility functions.
//!
//! The survey tables mix integer, floating-point and string-coded columns, so
//! every cleaning step reads cells through these helpers instead of matching on
//! `AnyValue` variants itself.

use polars::prelude::{AnyValue, DataFrame, DataType, PolarsResult};

/// Returns true when a cell counts as missing.
///
/// Polars nulls are the missing marker written by the cleaning pipeline. A
/// floating-point `NaN` read from a raw file is treated the same way.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use seg_common::is_missing;
///
/// assert!(is_missing(&AnyValue::Null));
/// assert!(is_missing(&AnyValue::Float64(f64::NAN)));
/// assert!(!is_missing(&AnyValue::Int64(0)));
/// ```
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::Float32(v) => v.is_nan(),
        AnyValue::Float64(v) => v.is_nan(),
        _ => false,
    }
}

/// Counts missing cells in every row of a DataFrame.
pub fn missing_counts_by_row(df: &DataFrame) -> PolarsResult<Vec<usize>> {
    let mut counts = vec![0usize; df.height()];
    for column in df.get_columns() {
        for (idx, count) in counts.iter_mut().enumerate() {
            if is_missing(&column.get(idx)?) {
                *count += 1;
            }
        }
    }
    Ok(counts)
}

/// Returns true for the integer and floating-point dtypes a cleaned table may hold.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null` and formats floats without trailing zeros,
/// so `3.0` and `3` render identically.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use seg_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Float64(4.0)), "4");
/// assert_eq!(any_to_string(AnyValue::String("XX")), "XX");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Formats a floating-point number without trailing zeros after the decimal point.
///
/// # Examples
///
/// ```
/// use seg_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(40.0), "40");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for missing or non-numeric values.
///
/// Numeric strings are parsed, so string-typed code columns compare equal to
/// their integer sentinels.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    let number = match value {
        AnyValue::Int8(v) => f64::from(v),
        AnyValue::Int16(v) => f64::from(v),
        AnyValue::Int32(v) => f64::from(v),
        AnyValue::Int64(v) => v as f64,
        AnyValue::UInt8(v) => f64::from(v),
        AnyValue::UInt16(v) => f64::from(v),
        AnyValue::UInt32(v) => f64::from(v),
        AnyValue::UInt64(v) => v as f64,
        AnyValue::Float32(v) => f64::from(v),
        AnyValue::Float64(v) => v,
        AnyValue::String(s) => parse_f64(s)?,
        AnyValue::StringOwned(s) => parse_f64(&s)?,
        _ => return None,
    };
    if number.is_nan() { None } else { Some(number) }
}

/// Reads a cell as an exact integer code.
///
/// Integers pass through, floats are accepted only when integral, and strings
/// are parsed as integers (or integral decimals such as `"3.0"`). Everything
/// else, including missing cells, yields `None`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use seg_common::integral_value;
///
/// assert_eq!(integral_value(AnyValue::Float64(3.0)), Some(3));
/// assert_eq!(integral_value(AnyValue::Float64(3.5)), None);
/// assert_eq!(integral_value(AnyValue::String("51")), Some(51));
/// assert_eq!(integral_value(AnyValue::String("XX")), None);
/// ```
pub fn integral_value(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::String(s) => parse_i64(s).or_else(|| parse_f64(s).and_then(integral_f64)),
        AnyValue::StringOwned(s) => parse_i64(&s).or_else(|| parse_f64(&s).and_then(integral_f64)),
        other => any_to_f64(other).and_then(integral_f64),
    }
}

fn integral_f64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        Some(v as i64)
    } else {
        None
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}
