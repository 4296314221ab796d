//! Cleaning and feature engineering for the demographic survey.
//!
//! The cleaning pipeline turns a raw survey table into an all-numeric
//! feature table suitable for scaling, dimensionality reduction and
//! clustering.
//!
//! # Overview
//!
//! - **Schema resolution**: parse the feature summary into sentinel and type maps
//! - **Sentinel replacement**: turn "missing or unknown" codes into nulls
//! - **Filtering**: drop sparse columns and rows
//! - **Re-encoding**: binary recodes and fixed-category one-hot encoding
//! - **Decomposition**: split compound-coded columns into their parts
//! - **Profiling**: missing-value and distribution summaries
//!
//! # Example
//!
//! ```ignore
//! use seg_model::CleaningConfig;
//! use seg_transform::{clean_demographics, resolve_schema};
//!
//! let schema = resolve_schema(&feature_summary)?;
//! let cleaned = clean_demographics(&azdias, &schema, &CleaningConfig::default())?;
//! ```

mod encode;
mod error;
mod filter;
mod frame;
mod mixed;
mod pipeline;
mod profile;
mod schema;
mod sentinel;

// Error type
pub use error::{CleaningError, Result};

// Schema resolution
pub use schema::{build_sentinel_map, build_type_map, parse_sentinel_spec, resolve_schema};

// Cleaning steps
pub use encode::{one_hot_encode, recode_binary, reencode_categoricals};
pub use filter::{drop_outlier_columns, drop_sparse_rows, missing_counts_by_row};
pub use mixed::{decompose_mixed_features, decompose_wealth_lifestage_code, decompose_youth_code};
pub use pipeline::clean_demographics;
pub use sentinel::{apply_sentinels, is_sentinel};

// Profiling
pub use profile::{
    categorical_comparison, missing_correlation, missing_value_counts, unique_values_summary,
};
