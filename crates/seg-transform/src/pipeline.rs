//! End-to-end cleaning of the demographic survey.

use polars::prelude::DataFrame;
use seg_model::{CleaningConfig, FeatureSchema};

use crate::encode::reencode_categoricals;
use crate::error::Result;
use crate::filter::{drop_outlier_columns, drop_sparse_rows};
use crate::mixed::decompose_mixed_features;
use crate::sentinel::apply_sentinels;

/// Clean a raw demographic table into an all-numeric feature table.
///
/// Steps, in order:
/// 1. replace sentinel codes with null;
/// 2. drop the outlier columns;
/// 3. drop rows with more than `config.row_missing_cutoff` missing cells;
/// 4. re-encode categorical columns;
/// 5. decompose the compound columns.
pub fn clean_demographics(
    demographics: &DataFrame,
    schema: &FeatureSchema,
    config: &CleaningConfig,
) -> Result<DataFrame> {
    log_stage("input", demographics);

    let sentinel_map = schema.sentinel_map();
    let df = apply_sentinels(demographics, &sentinel_map, config)?;
    log_stage("sentinels", &df);

    let df = drop_outlier_columns(&df, config)?;
    log_stage("outlier columns", &df);

    let df = drop_sparse_rows(&df, config.row_missing_cutoff)?;
    log_stage("sparse rows", &df);

    let df = reencode_categoricals(&df, config)?;
    log_stage("categoricals", &df);

    let df = decompose_mixed_features(&df, config)?;
    log_stage("mixed features", &df);

    Ok(df)
}

fn log_stage(stage: &str, df: &DataFrame) {
    tracing::info!(
        stage,
        rows = df.height(),
        columns = df.width(),
        "Cleaning stage complete"
    );
}
