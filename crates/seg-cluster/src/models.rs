//! Fitted model interfaces.
//!
//! Fitting dimensionality reduction, scaling and clustering happens outside
//! this crate. The traits describe what centroid reconstruction needs from the
//! fitted models; the structs hold already-fitted parameters.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{ClusterError, Result};

/// A fitted linear dimensionality reduction.
pub trait ReductionModel {
    /// Component matrix, one row per component and one column per feature.
    fn components(&self) -> ArrayView2<'_, f64>;

    /// Map reduced coordinates back to feature space.
    fn inverse_transform(&self, reduced: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

/// A fitted feature scaler.
pub trait ScalingModel {
    /// Names of the scaled features, in column order.
    fn feature_names(&self) -> &[String];

    /// Map scaled values back to original units.
    fn inverse_transform(&self, scaled: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

/// A fitted centroid-based clustering.
pub trait ClusteringModel {
    /// Centroid matrix, one row per cluster. Row index is the cluster id.
    fn centroids(&self) -> ArrayView2<'_, f64>;

    /// Assign each row of `data` to a cluster.
    fn predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>>;
}

/// Principal-component projection: `reduced · components + mean`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPca {
    components: Array2<f64>,
    mean: Array1<f64>,
}

impl LinearPca {
    /// `mean` holds one entry per feature (column of `components`).
    pub fn new(components: Array2<f64>, mean: Array1<f64>) -> Result<Self> {
        check_len("PCA mean length", components.ncols(), mean.len())?;
        Ok(Self { components, mean })
    }

    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }
}

impl ReductionModel for LinearPca {
    fn components(&self) -> ArrayView2<'_, f64> {
        self.components.view()
    }

    fn inverse_transform(&self, reduced: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        check_len("reduced column count", self.n_components(), reduced.ncols())?;
        Ok(reduced.dot(&self.components) + &self.mean)
    }
}

/// Standardization: `scaled * scale + mean` per feature.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaling {
    mean: Array1<f64>,
    scale: Array1<f64>,
    feature_names: Vec<String>,
}

impl StandardScaling {
    pub fn new(mean: Array1<f64>, scale: Array1<f64>, feature_names: Vec<String>) -> Result<Self> {
        check_len("scale length", mean.len(), scale.len())?;
        check_len("feature name count", mean.len(), feature_names.len())?;
        Ok(Self {
            mean,
            scale,
            feature_names,
        })
    }
}

impl ScalingModel for StandardScaling {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn inverse_transform(&self, scaled: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        check_len("scaled column count", self.mean.len(), scaled.ncols())?;
        Ok(&scaled * &self.scale + &self.mean)
    }
}

/// Clustering by nearest Euclidean centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestCentroid {
    centroids: Array2<f64>,
}

impl NearestCentroid {
    pub fn new(centroids: Array2<f64>) -> Result<Self> {
        if centroids.nrows() == 0 {
            return Err(ClusterError::ShapeMismatch {
                what: "centroid count",
                expected: 1,
                actual: 0,
            });
        }
        Ok(Self { centroids })
    }
}

impl ClusteringModel for NearestCentroid {
    fn centroids(&self) -> ArrayView2<'_, f64> {
        self.centroids.view()
    }

    fn predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        check_len("feature count", self.centroids.ncols(), data.ncols())?;

        let labels = data
            .axis_iter(Axis(0))
            .map(|point| {
                let mut closest = 0;
                let mut min_distance = f64::INFINITY;
                for (cluster_id, centroid) in self.centroids.outer_iter().enumerate() {
                    let distance: f64 = point
                        .iter()
                        .zip(centroid.iter())
                        .map(|(a, b)| (a - b).powi(2))
                        .sum();
                    if distance < min_distance {
                        min_distance = distance;
                        closest = cluster_id;
                    }
                }
                closest
            })
            .collect();
        Ok(labels)
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ClusterError::ShapeMismatch {
            what,
            expected,
            actual,
        })
    }
}
