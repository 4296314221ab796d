//! Shared utilities for the segmentation workspace.
//!
//! Cell-level helpers over Polars `AnyValue`: missing detection, numeric
//! coercion and value formatting used by the cleaning, validation and
//! clustering crates.

pub mod polars;

pub use self::polars::{
    any_to_f64, any_to_string, format_numeric, integral_value, is_missing, is_numeric_dtype,
    missing_counts_by_row, parse_f64, parse_i64,
};
