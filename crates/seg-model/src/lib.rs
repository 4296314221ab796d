//! Data model for the demographic segmentation workspace.
//!
//! - [`schema`]: per-column sentinel values and declared feature types
//! - [`options`]: the per-dataset constant tables that drive cleaning and validation
//! - [`cluster`]: cluster count and comparison rows

pub mod cluster;
pub mod options;
pub mod schema;

pub use cluster::{ClusterComparisonRow, ClusterCountRow, GroupLabels};
pub use options::{BinaryRecode, CleaningConfig, MixedFeatureConfig, OneHotColumn, ValidationConfig};
pub use schema::{FeatureSchema, FeatureSpec, FeatureType, SentinelValue};
