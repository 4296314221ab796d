//! Feature summary resolution.
//!
//! The feature summary has one row per survey column with the columns
//! `attribute`, `missing_or_unknown` and `type`. The missing/unknown spec is a
//! bracketed list such as `[-1,0]`, `[-1,X]` or `[]`.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use seg_common::{any_to_string, parse_i64};
use seg_model::{FeatureSchema, FeatureType, SentinelValue};

use crate::error::{CleaningError, Result};
use crate::frame::require_column;

/// Column holding the survey column name.
const ATTRIBUTE_COLUMN: &str = "attribute";
/// Column holding the bracketed missing/unknown spec.
const MISSING_COLUMN: &str = "missing_or_unknown";
/// Column holding the declared data kind.
const TYPE_COLUMN: &str = "type";

/// Parse a missing/unknown spec into typed sentinel values.
///
/// The spec must begin with `[` and end with `]` exactly; surrounding
/// whitespace is rejected. Tokens that parse as integers become
/// [`SentinelValue::Int`]; everything else is kept as trimmed text.
///
/// # Examples
///
/// ```
/// use seg_model::SentinelValue;
/// use seg_transform::parse_sentinel_spec;
///
/// let values = parse_sentinel_spec("[-1,X]").unwrap();
/// assert_eq!(values, vec![SentinelValue::Int(-1), SentinelValue::Text("X".into())]);
/// assert!(parse_sentinel_spec("[]").unwrap().is_empty());
/// assert!(parse_sentinel_spec("-1,0").is_err());
/// ```
pub fn parse_sentinel_spec(spec: &str) -> Result<Vec<SentinelValue>> {
    let inner = spec
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| CleaningError::SentinelFormat {
            spec: spec.to_string(),
        })?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(inner
        .split(',')
        .map(|token| match parse_i64(token) {
            Some(value) => SentinelValue::Int(value),
            None => SentinelValue::Text(token.trim().to_string()),
        })
        .collect())
}

/// Build the column → sentinel values map from a feature summary.
pub fn build_sentinel_map(summary: &DataFrame) -> Result<BTreeMap<String, Vec<SentinelValue>>> {
    let specs = string_column(summary, MISSING_COLUMN)?;
    let mut map = BTreeMap::new();
    for (attribute, spec) in attributes(summary)?.into_iter().zip(specs) {
        let sentinels = parse_sentinel_spec(&spec)?;
        insert_unique(&mut map, attribute, sentinels)?;
    }
    Ok(map)
}

/// Build the column → declared type map from a feature summary.
pub fn build_type_map(summary: &DataFrame) -> Result<BTreeMap<String, FeatureType>> {
    let types = string_column(summary, TYPE_COLUMN)?;
    let mut map = BTreeMap::new();
    for (attribute, declared) in attributes(summary)?.into_iter().zip(types) {
        insert_unique(&mut map, attribute, FeatureType::parse(&declared))?;
    }
    Ok(map)
}

/// Resolve a feature summary into a [`FeatureSchema`].
pub fn resolve_schema(summary: &DataFrame) -> Result<FeatureSchema> {
    let sentinels = build_sentinel_map(summary)?;
    let types = build_type_map(summary)?;
    let schema = FeatureSchema::from_maps(sentinels, &types);
    tracing::debug!(columns = schema.len(), "Resolved feature schema");
    Ok(schema)
}

fn attributes(summary: &DataFrame) -> Result<Vec<String>> {
    string_column(summary, ATTRIBUTE_COLUMN)
}

fn string_column(summary: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = require_column(summary, name)?;
    let mut values = Vec::with_capacity(summary.height());
    for idx in 0..summary.height() {
        values.push(any_to_string(column.get(idx)?).trim().to_string());
    }
    Ok(values)
}

fn insert_unique<V>(map: &mut BTreeMap<String, V>, column: String, value: V) -> Result<()> {
    if map.contains_key(&column) {
        return Err(CleaningError::DuplicateColumn { column });
    }
    map.insert(column, value);
    Ok(())
}
