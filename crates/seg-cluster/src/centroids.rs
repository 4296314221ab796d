//! Centroid reconstruction and cluster statistic tables.
//!
//! Cluster centroids live in the reduced space. They are mapped back through
//! the reduction's inverse to standardized feature space, then through the
//! scaler's inverse to original units, and each view is joined with the
//! per-cluster comparison statistics.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use ndarray::{Array2, ArrayView2};
use polars::prelude::{Column, DataFrame};
use seg_model::{ClusterComparisonRow, GroupLabels};

use crate::error::{ClusterError, Result};
use crate::models::{ClusteringModel, ReductionModel, ScalingModel};

/// Centroids in each coordinate system. Row `i` is cluster `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct CentroidViews {
    pub reduced: Array2<f64>,
    pub scaled: Array2<f64>,
    pub original: Array2<f64>,
}

/// Map reduced-space centroids to standardized and original units.
pub fn reconstruct_centroids<R, S>(
    reduced: ArrayView2<'_, f64>,
    reducer: &R,
    scaler: &S,
) -> Result<CentroidViews>
where
    R: ReductionModel + ?Sized,
    S: ScalingModel + ?Sized,
{
    let scaled = reducer.inverse_transform(reduced)?;
    if scaled.ncols() != scaler.feature_names().len() {
        return Err(ClusterError::ShapeMismatch {
            what: "reconstructed feature count",
            expected: scaler.feature_names().len(),
            actual: scaled.ncols(),
        });
    }
    let original = scaler.inverse_transform(scaled.view())?;
    Ok(CentroidViews {
        reduced: reduced.to_owned(),
        scaled,
        original,
    })
}

/// One centroid with its cluster statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct CentroidRow {
    pub cluster_id: usize,
    /// Customer share relative to the population share.
    pub normalized_customer_frac: f64,
    /// Population share.
    pub demographics_frac: f64,
    pub features: Vec<f64>,
}

/// Centroids in one coordinate system, ordered by ascending
/// `normalized_customer_frac`.
#[derive(Debug, Clone, PartialEq)]
pub struct CentroidTable {
    pub feature_names: Vec<String>,
    pub rows: Vec<CentroidRow>,
}

impl CentroidTable {
    /// Columns: `cluster_id`, `normalized_customer_frac`, `demographics_frac`,
    /// then one Float64 column per feature.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        for row in &self.rows {
            if row.features.len() != self.feature_names.len() {
                return Err(ClusterError::ShapeMismatch {
                    what: "centroid feature count",
                    expected: self.feature_names.len(),
                    actual: row.features.len(),
                });
            }
        }

        let mut columns = Vec::with_capacity(self.feature_names.len() + 3);
        columns.push(Column::new(
            "cluster_id".into(),
            self.rows.iter().map(|row| row.cluster_id as u64).collect::<Vec<u64>>(),
        ));
        columns.push(Column::new(
            "normalized_customer_frac".into(),
            self.rows
                .iter()
                .map(|row| row.normalized_customer_frac)
                .collect::<Vec<f64>>(),
        ));
        columns.push(Column::new(
            "demographics_frac".into(),
            self.rows.iter().map(|row| row.demographics_frac).collect::<Vec<f64>>(),
        ));
        for (idx, name) in self.feature_names.iter().enumerate() {
            columns.push(Column::new(
                name.as_str().into(),
                self.rows.iter().map(|row| row.features[idx]).collect::<Vec<f64>>(),
            ));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Join centroid coordinates with the comparison statistics.
///
/// Centroid row `i` is cluster `i`. Its statistics are looked up by cluster id:
/// the customer group's normalized share and the demographics group's raw
/// share. A group listing the same cluster twice is rejected.
pub fn join_cluster_stats(
    centroids: ArrayView2<'_, f64>,
    feature_names: &[String],
    comparison: &[ClusterComparisonRow],
    labels: &GroupLabels,
) -> Result<CentroidTable> {
    if feature_names.len() != centroids.ncols() {
        return Err(ClusterError::ShapeMismatch {
            what: "feature name count",
            expected: centroids.ncols(),
            actual: feature_names.len(),
        });
    }

    let mut stats: BTreeMap<(&str, usize), &ClusterComparisonRow> = BTreeMap::new();
    for row in comparison {
        match stats.entry((row.group.as_str(), row.cluster_id())) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(_) => {
                return Err(ClusterError::DuplicateStatistics {
                    group: row.group.clone(),
                    cluster_id: row.cluster_id(),
                });
            }
        }
    }
    let lookup = |group: &str, cluster_id: usize| {
        stats
            .get(&(group, cluster_id))
            .copied()
            .ok_or_else(|| ClusterError::MissingGroup {
                group: group.to_string(),
                cluster_id,
            })
    };

    let mut rows = Vec::with_capacity(centroids.nrows());
    for (cluster_id, centroid) in centroids.outer_iter().enumerate() {
        let customer = lookup(&labels.customer, cluster_id)?;
        let normalized_customer_frac =
            customer
                .normalized_frac
                .ok_or_else(|| ClusterError::NotNormalized {
                    group: labels.customer.clone(),
                    cluster_id,
                })?;
        let demographics = lookup(&labels.demographics, cluster_id)?;
        rows.push(CentroidRow {
            cluster_id,
            normalized_customer_frac,
            demographics_frac: demographics.counts.frac,
            features: centroid.to_vec(),
        });
    }

    rows.sort_by(|a, b| a.normalized_customer_frac.total_cmp(&b.normalized_customer_frac));

    Ok(CentroidTable {
        feature_names: feature_names.to_vec(),
        rows,
    })
}

/// Centroid tables in reduced, standardized and original units.
#[derive(Debug, Clone, PartialEq)]
pub struct CentroidTables {
    /// Features `pca_0`, `pca_1`, ...
    pub reduced: CentroidTable,
    /// Features `scaled_{name}`.
    pub scaled: CentroidTable,
    /// Features `{name}`.
    pub original: CentroidTable,
}

/// Reconstruct the clustering's centroids and build all three tables.
pub fn centroid_tables<C, R, S>(
    clustering: &C,
    reducer: &R,
    scaler: &S,
    comparison: &[ClusterComparisonRow],
    labels: &GroupLabels,
) -> Result<CentroidTables>
where
    C: ClusteringModel + ?Sized,
    R: ReductionModel + ?Sized,
    S: ScalingModel + ?Sized,
{
    let views = reconstruct_centroids(clustering.centroids(), reducer, scaler)?;

    let reduced_names: Vec<String> = (0..views.reduced.ncols()).map(|i| format!("pca_{i}")).collect();
    let scaled_names: Vec<String> = scaler
        .feature_names()
        .iter()
        .map(|name| format!("scaled_{name}"))
        .collect();
    let original_names = scaler.feature_names().to_vec();

    let tables = CentroidTables {
        reduced: join_cluster_stats(views.reduced.view(), &reduced_names, comparison, labels)?,
        scaled: join_cluster_stats(views.scaled.view(), &scaled_names, comparison, labels)?,
        original: join_cluster_stats(views.original.view(), &original_names, comparison, labels)?,
    };
    tracing::debug!(
        clusters = views.reduced.nrows(),
        components = views.reduced.ncols(),
        features = original_names.len(),
        "Built centroid tables"
    );
    Ok(tables)
}

/// Component loadings, one row per feature.
///
/// Columns: `column_name`, `column_num`, then one Float64 column per
/// component named `"0"`, `"1"`, ...
pub fn pca_components_table<R>(reducer: &R, column_names: &[String]) -> Result<DataFrame>
where
    R: ReductionModel + ?Sized,
{
    let components = reducer.components();
    if column_names.len() != components.ncols() {
        return Err(ClusterError::ShapeMismatch {
            what: "column name count",
            expected: components.ncols(),
            actual: column_names.len(),
        });
    }

    let mut columns = Vec::with_capacity(components.nrows() + 2);
    columns.push(Column::new("column_name".into(), column_names.to_vec()));
    columns.push(Column::new(
        "column_num".into(),
        (0..column_names.len() as u64).collect::<Vec<u64>>(),
    ));
    for (idx, component) in components.outer_iter().enumerate() {
        columns.push(Column::new(
            idx.to_string().as_str().into(),
            component.to_vec(),
        ));
    }
    Ok(DataFrame::new(columns)?)
}
