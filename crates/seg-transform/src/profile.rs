//! Exploratory summaries of a survey table.
//!
//! These helpers back the decisions encoded in the cleaning configuration:
//! which columns are too sparse to keep, whether missingness is correlated
//! across columns, and whether dropped rows differ from kept ones.

use std::collections::{BTreeMap, HashMap, HashSet};

use polars::prelude::{Column, DataFrame};
use seg_common::{any_to_string, is_missing};
use seg_model::FeatureType;

use crate::error::{CleaningError, Result};
use crate::frame::{column_names, require_column};

/// Per-column counts of present and missing cells.
///
/// Output columns: `column`, `count_with_vals`, `count_with_nans`,
/// `count_total`, `frac_with_vals`, `frac_with_nans`.
pub fn missing_value_counts(table: &DataFrame) -> Result<DataFrame> {
    let total = table.height();
    let mut names = Vec::with_capacity(table.width());
    let mut with_vals = Vec::with_capacity(table.width());
    let mut with_nans = Vec::with_capacity(table.width());

    for column in table.get_columns() {
        let missing = missing_mask(column)?.iter().filter(|m| **m).count();
        names.push(column.name().to_string());
        with_vals.push((total - missing) as u64);
        with_nans.push(missing as u64);
    }

    let fraction = |count: &u64| {
        if total == 0 {
            f64::NAN
        } else {
            *count as f64 / total as f64
        }
    };
    let frac_with_vals: Vec<f64> = with_vals.iter().map(fraction).collect();
    let frac_with_nans: Vec<f64> = with_nans.iter().map(fraction).collect();
    let count_total = vec![total as u64; names.len()];

    Ok(DataFrame::new(vec![
        Column::new("column".into(), names),
        Column::new("count_with_vals".into(), with_vals),
        Column::new("count_with_nans".into(), with_nans),
        Column::new("count_total".into(), count_total),
        Column::new("frac_with_vals".into(), frac_with_vals),
        Column::new("frac_with_nans".into(), frac_with_nans),
    ])?)
}

/// Pearson correlation between the missing-value indicators of every column
/// that has at least one missing cell.
///
/// The first output column, `column`, names the row; the remaining columns
/// follow the same order. Pairs involving a constant indicator are NaN.
pub fn missing_correlation(table: &DataFrame) -> Result<DataFrame> {
    let mut names = Vec::new();
    let mut indicators: Vec<Vec<f64>> = Vec::new();
    for column in table.get_columns() {
        let mask = missing_mask(column)?;
        if mask.iter().any(|m| *m) {
            names.push(column.name().to_string());
            indicators.push(mask.into_iter().map(|m| if m { 1.0 } else { 0.0 }).collect());
        }
    }

    let mut columns = vec![Column::new("column".into(), names.clone())];
    for (name, x) in names.iter().zip(&indicators) {
        let values: Vec<f64> = indicators.iter().map(|y| pearson(x, y)).collect();
        columns.push(Column::new(name.as_str().into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

/// Compare the distribution of one column across two tables.
///
/// Each side contributes its normalized value counts (missing cells excluded)
/// tagged with its label. Output columns: `value`, `proportion`, `category`.
pub fn categorical_comparison(
    left: &DataFrame,
    right: &DataFrame,
    column: &str,
    left_label: &str,
    right_label: &str,
) -> Result<DataFrame> {
    let mut values = Vec::new();
    let mut proportions = Vec::new();
    let mut categories = Vec::new();

    for (table, label) in [(left, left_label), (right, right_label)] {
        for (value, proportion) in value_proportions(require_column(table, column)?)? {
            values.push(value);
            proportions.push(proportion);
            categories.push(label.to_string());
        }
    }

    Ok(DataFrame::new(vec![
        Column::new("value".into(), values),
        Column::new("proportion".into(), proportions),
        Column::new("category".into(), categories),
    ])?)
}

/// Per-column declared type, distinct-value count and up to ten example values.
///
/// Every table column needs an entry in `types`.
pub fn unique_values_summary(
    table: &DataFrame,
    types: &BTreeMap<String, FeatureType>,
) -> Result<DataFrame> {
    let names = column_names(table);
    let untyped: Vec<String> = names
        .iter()
        .filter(|name| !types.contains_key(*name))
        .cloned()
        .collect();
    if !untyped.is_empty() {
        return Err(CleaningError::SchemaMismatch { columns: untyped });
    }

    let mut data_types = Vec::with_capacity(names.len());
    let mut unique_counts = Vec::with_capacity(names.len());
    let mut examples = Vec::with_capacity(names.len());
    for column in table.get_columns() {
        let distinct = distinct_values(column)?;
        let name = column.name().as_str();
        data_types.push(types.get(name).map(FeatureType::to_string).unwrap_or_default());
        unique_counts.push(distinct.len() as u64);
        examples.push(distinct.iter().take(10).cloned().collect::<Vec<_>>().join(", "));
    }

    Ok(DataFrame::new(vec![
        Column::new("column".into(), names),
        Column::new("data_type".into(), data_types),
        Column::new("num_unique_values".into(), unique_counts),
        Column::new("ten_example_values".into(), examples),
    ])?)
}

fn missing_mask(column: &Column) -> Result<Vec<bool>> {
    let mut mask = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        mask.push(is_missing(&column.get(idx)?));
    }
    Ok(mask)
}

/// Distinct non-missing values in order of first appearance.
fn distinct_values(column: &Column) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for idx in 0..column.len() {
        let value = column.get(idx)?;
        if is_missing(&value) {
            continue;
        }
        let text = any_to_string(value);
        if seen.insert(text.clone()) {
            distinct.push(text);
        }
    }
    Ok(distinct)
}

/// Normalized value counts, largest share first, ties by value.
fn value_proportions(column: &Column) -> Result<Vec<(String, f64)>> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut present = 0usize;
    for idx in 0..column.len() {
        let value = column.get(idx)?;
        if is_missing(&value) {
            continue;
        }
        present += 1;
        *counts.entry(any_to_string(value)).or_default() += 1;
    }

    let mut rows: Vec<(String, usize)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(rows
        .into_iter()
        .map(|(value, count)| (value, count as f64 / present as f64))
        .collect())
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    if n == 0.0 {
        return f64::NAN;
    }
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 { f64::NAN } else { cov / denom }
}
