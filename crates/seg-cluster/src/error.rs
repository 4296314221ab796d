//! Error types for cluster statistics.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while computing or joining cluster statistics.
#[derive(Debug, Error)]
pub enum ClusterError {
    // === Count Errors ===
    /// No cluster labels were supplied for a group.
    #[error("cluster assignment is empty")]
    EmptyAssignment,

    /// A computed statistic broke one of its postconditions.
    #[error("cluster statistics invariant violated: {message}")]
    Invariant { message: String },

    // === Normalization Errors ===
    /// The reference group lists a cluster more than once.
    #[error("cluster {cluster_id} appears more than once in reference group '{group}'")]
    DuplicateReferenceCluster { group: String, cluster_id: usize },

    /// A row's cluster has no entry in the reference group.
    #[error("cluster {cluster_id} not found in reference group '{group}'")]
    MissingReference { group: String, cluster_id: usize },

    /// The reference share of a cluster is zero.
    #[error("reference group '{group}' has zero share for cluster {cluster_id}")]
    ZeroReferenceFraction { group: String, cluster_id: usize },

    /// The reference group is not one of the compared groups.
    #[error("reference group '{group}' is not one of {}", .groups.join(", "))]
    UnknownReferenceGroup { group: String, groups: Vec<String> },

    /// Both compared groups carry the same label.
    #[error("group label '{group}' is used for both groups")]
    DuplicateGroup { group: String },

    // === Centroid Errors ===
    /// Comparison statistics list a group and cluster more than once.
    #[error("cluster {cluster_id} appears more than once in group '{group}'")]
    DuplicateStatistics { group: String, cluster_id: usize },

    /// No statistics row for a group and cluster.
    #[error("no statistics for cluster {cluster_id} in group '{group}'")]
    MissingGroup { group: String, cluster_id: usize },

    /// A statistics row has not been normalized.
    #[error("cluster {cluster_id} in group '{group}' has no normalized share")]
    NotNormalized { group: String, cluster_id: usize },

    /// Matrix or name list dimensions disagree.
    #[error("{what}: expected {expected}, found {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for ClusterError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for cluster statistics.
pub type Result<T> = std::result::Result<T, ClusterError>;
