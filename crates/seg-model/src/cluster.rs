//! Cluster membership statistics.

use serde::{Deserialize, Serialize};

/// Count statistics for one cluster within one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterCountRow {
    pub cluster_id: usize,
    pub count: u64,
    /// Poisson error on the count, `sqrt(count)`.
    pub count_error: f64,
    /// Share of the group in this cluster.
    pub frac: f64,
    /// `count_error / total`.
    pub frac_error: f64,
}

/// A count row tagged with its group, plus the normalized share once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterComparisonRow {
    pub group: String,
    pub counts: ClusterCountRow,
    /// `frac` divided by the reference group's `frac` for the same cluster.
    pub normalized_frac: Option<f64>,
    pub normalized_frac_error: Option<f64>,
}

impl ClusterComparisonRow {
    pub fn new(group: impl Into<String>, counts: ClusterCountRow) -> Self {
        Self {
            group: group.into(),
            counts,
            normalized_frac: None,
            normalized_frac_error: None,
        }
    }

    pub fn cluster_id(&self) -> usize {
        self.counts.cluster_id
    }
}

/// Group names used when joining comparison statistics onto centroids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLabels {
    /// Group whose normalized share ranks the clusters.
    pub customer: String,
    /// Reference population whose raw share is reported alongside.
    pub demographics: String,
}

impl Default for GroupLabels {
    fn default() -> Self {
        Self {
            customer: "customer".to_string(),
            demographics: "demographics".to_string(),
        }
    }
}
