//! Cluster membership statistics for a customer/population comparison.
//!
//! Given cluster labels for two groups, this crate counts members per
//! cluster with Poisson errors, normalizes one group's shares against the
//! other's, and joins the resulting statistics onto cluster centroids in
//! reduced, standardized and original coordinates.
//!
//! Model fitting is external: the [`ReductionModel`], [`ScalingModel`] and
//! [`ClusteringModel`] traits describe the fitted models, and [`LinearPca`],
//! [`StandardScaling`] and [`NearestCentroid`] hold fitted parameters.

mod centroids;
mod counts;
mod error;
mod models;
mod normalize;

pub use error::{ClusterError, Result};

pub use counts::{FRACTION_SUM_TOLERANCE, aggregate_counts, union_cluster_ids};
pub use normalize::{ClusterComparison, compare_clusters, normalize};

pub use centroids::{
    CentroidRow, CentroidTable, CentroidTables, CentroidViews, centroid_tables,
    join_cluster_stats, pca_components_table, reconstruct_centroids,
};
pub use models::{
    ClusteringModel, LinearPca, NearestCentroid, ReductionModel, ScalingModel, StandardScaling,
};
