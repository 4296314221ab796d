//! Cross-group normalization of cluster shares.
//!
//! A group's share of a cluster is divided by the reference group's share of
//! the same cluster. With `x` the share, `y` the reference share and `dx`,
//! `dy` their errors, the propagated error of `q = x / y` is
//! `sqrt((dx / y)^2 + (x * dy / y^2)^2)`.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame};
use seg_model::ClusterComparisonRow;

use crate::counts::{aggregate_counts, union_cluster_ids};
use crate::error::{ClusterError, Result};

/// Fill `normalized_frac` and `normalized_frac_error` on every row, in place.
///
/// Every check runs before any row is written, so on error the rows are
/// unchanged.
///
/// # Examples
///
/// ```
/// use seg_cluster::normalize;
/// use seg_model::{ClusterComparisonRow, ClusterCountRow};
///
/// let row = |group: &str, cluster_id, frac| {
///     ClusterComparisonRow::new(group, ClusterCountRow {
///         cluster_id,
///         count: 1,
///         count_error: 0.0,
///         frac,
///         frac_error: 0.0,
///     })
/// };
/// let mut rows = vec![
///     row("demographics", 0, 0.5),
///     row("demographics", 1, 0.5),
///     row("customer", 0, 0.25),
/// ];
/// normalize(&mut rows, "demographics").unwrap();
/// assert_eq!(rows[2].normalized_frac, Some(0.5));
/// ```
pub fn normalize(rows: &mut [ClusterComparisonRow], reference_group: &str) -> Result<()> {
    let mut reference: BTreeMap<usize, (f64, f64)> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.group == reference_group) {
        let cluster_id = row.cluster_id();
        if reference.contains_key(&cluster_id) {
            return Err(ClusterError::DuplicateReferenceCluster {
                group: reference_group.to_string(),
                cluster_id,
            });
        }
        if row.counts.frac == 0.0 {
            return Err(ClusterError::ZeroReferenceFraction {
                group: reference_group.to_string(),
                cluster_id,
            });
        }
        reference.insert(cluster_id, (row.counts.frac, row.counts.frac_error));
    }

    let mut normalized = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let cluster_id = row.cluster_id();
        let &(ref_frac, ref_error) =
            reference
                .get(&cluster_id)
                .ok_or_else(|| ClusterError::MissingReference {
                    group: reference_group.to_string(),
                    cluster_id,
                })?;
        let frac = row.counts.frac;
        let error = row.counts.frac_error;
        let value = frac / ref_frac;
        let value_error =
            ((error / ref_frac).powi(2) + (frac * ref_error / ref_frac.powi(2)).powi(2)).sqrt();
        normalized.push((value, value_error));
    }

    for (row, (value, value_error)) in rows.iter_mut().zip(normalized) {
        row.normalized_frac = Some(value);
        row.normalized_frac_error = Some(value_error);
    }
    tracing::debug!(reference = %reference_group, rows = rows.len(), "Normalized cluster shares");
    Ok(())
}

/// Metrics spread into `<metric>_<group>` columns by [`ClusterComparison::to_wide_dataframe`].
const WIDE_METRICS: [&str; 6] = [
    "count",
    "count_error",
    "frac",
    "frac_error",
    "normalized_frac",
    "normalized_frac_error",
];

/// Cluster statistics for two groups, normalized against one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterComparison {
    groups: [String; 2],
    reference_group: String,
    rows: Vec<ClusterComparisonRow>,
}

impl ClusterComparison {
    /// All rows: the first group's clusters in id order, then the second's.
    pub fn rows(&self) -> &[ClusterComparisonRow] {
        &self.rows
    }

    pub fn groups(&self) -> &[String; 2] {
        &self.groups
    }

    pub fn reference_group(&self) -> &str {
        &self.reference_group
    }

    /// Rows for one group.
    pub fn group_rows<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a ClusterComparisonRow> {
        self.rows.iter().filter(move |row| row.group == group)
    }

    /// Sorted distinct cluster ids.
    pub fn cluster_ids(&self) -> Vec<usize> {
        let ids: Vec<usize> = self.rows.iter().map(ClusterComparisonRow::cluster_id).collect();
        union_cluster_ids(&ids, &[])
    }

    /// One row per (group, cluster).
    ///
    /// Columns: `cluster_id`, `count`, `count_error`, `frac`, `frac_error`,
    /// `group`, `normalized_frac`, `normalized_frac_error`.
    pub fn to_long_dataframe(&self) -> Result<DataFrame> {
        let rows = &self.rows;

        Ok(DataFrame::new(vec![
            Column::new(
                "cluster_id".into(),
                rows.iter().map(|row| row.cluster_id() as u64).collect::<Vec<u64>>(),
            ),
            Column::new(
                "count".into(),
                rows.iter().map(|row| row.counts.count).collect::<Vec<u64>>(),
            ),
            f64_column("count_error", rows, |row| row.counts.count_error),
            f64_column("frac", rows, |row| row.counts.frac),
            f64_column("frac_error", rows, |row| row.counts.frac_error),
            Column::new(
                "group".into(),
                rows.iter().map(|row| row.group.clone()).collect::<Vec<String>>(),
            ),
            optional_column("normalized_frac", rows, |row| row.normalized_frac),
            optional_column("normalized_frac_error", rows, |row| row.normalized_frac_error),
        ])?)
    }

    /// One row per cluster id with `<metric>_<group>` columns.
    ///
    /// Metrics vary slowest, groups fastest. A count absent for a group is 0;
    /// other absent metrics are null.
    pub fn to_wide_dataframe(&self) -> Result<DataFrame> {
        let ids = self.cluster_ids();
        let mut lookup: BTreeMap<(&str, usize), &ClusterComparisonRow> = BTreeMap::new();
        for row in &self.rows {
            lookup.insert((row.group.as_str(), row.cluster_id()), row);
        }

        let mut columns = vec![Column::new(
            "cluster_id".into(),
            ids.iter().map(|&id| id as u64).collect::<Vec<u64>>(),
        )];
        for metric in WIDE_METRICS {
            for group in &self.groups {
                let name = format!("{metric}_{group}");
                let cells = ids.iter().map(|&id| lookup.get(&(group.as_str(), id)));
                let column = if metric == "count" {
                    let counts: Vec<u64> = cells.map(|row| row.map_or(0, |r| r.counts.count)).collect();
                    Column::new(name.as_str().into(), counts)
                } else {
                    let values: Vec<Option<f64>> =
                        cells.map(|row| row.and_then(|r| wide_metric(r, metric))).collect();
                    Column::new(name.as_str().into(), values)
                };
                columns.push(column);
            }
        }
        Ok(DataFrame::new(columns)?)
    }
}

fn f64_column(
    name: &str,
    rows: &[ClusterComparisonRow],
    get: impl Fn(&ClusterComparisonRow) -> f64,
) -> Column {
    Column::new(name.into(), rows.iter().map(get).collect::<Vec<f64>>())
}

fn optional_column(
    name: &str,
    rows: &[ClusterComparisonRow],
    get: impl Fn(&ClusterComparisonRow) -> Option<f64>,
) -> Column {
    Column::new(name.into(), rows.iter().map(get).collect::<Vec<Option<f64>>>())
}

fn wide_metric(row: &ClusterComparisonRow, metric: &str) -> Option<f64> {
    match metric {
        "count_error" => Some(row.counts.count_error),
        "frac" => Some(row.counts.frac),
        "frac_error" => Some(row.counts.frac_error),
        "normalized_frac" => row.normalized_frac,
        "normalized_frac_error" => row.normalized_frac_error,
        _ => None,
    }
}

/// Count, concatenate and normalize the cluster labels of two groups.
///
/// Both groups get a row for every cluster id seen in either group.
pub fn compare_clusters(
    labels_1: &[usize],
    labels_2: &[usize],
    groups: [&str; 2],
    reference_group: &str,
) -> Result<ClusterComparison> {
    if groups[0] == groups[1] {
        return Err(ClusterError::DuplicateGroup {
            group: groups[0].to_string(),
        });
    }
    if !groups.contains(&reference_group) {
        return Err(ClusterError::UnknownReferenceGroup {
            group: reference_group.to_string(),
            groups: groups.iter().map(|g| (*g).to_string()).collect(),
        });
    }

    let ids = union_cluster_ids(labels_1, labels_2);
    let mut rows = Vec::with_capacity(ids.len() * 2);
    for (labels, group) in [(labels_1, groups[0]), (labels_2, groups[1])] {
        rows.extend(
            aggregate_counts(labels, &ids)?
                .into_iter()
                .map(|counts| ClusterComparisonRow::new(group, counts)),
        );
    }

    // adds normalized_frac / normalized_frac_error to the rows in place
    normalize(&mut rows, reference_group)?;

    tracing::info!(
        clusters = ids.len(),
        first = %groups[0],
        second = %groups[1],
        reference = %reference_group,
        "Compared cluster membership"
    );
    Ok(ClusterComparison {
        groups: [groups[0].to_string(), groups[1].to_string()],
        reference_group: reference_group.to_string(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::AnyValue;
    use seg_model::ClusterCountRow;

    fn row(group: &str, cluster_id: usize, frac: f64, frac_error: f64) -> ClusterComparisonRow {
        ClusterComparisonRow::new(
            group,
            ClusterCountRow {
                cluster_id,
                count: 1,
                count_error: 1.0,
                frac,
                frac_error,
            },
        )
    }

    #[test]
    fn normalizes_against_reference() {
        let mut rows = vec![
            row("demographics", 0, 0.5, 0.1),
            row("demographics", 1, 0.5, 0.1),
            row("customer", 0, 0.25, 0.05),
        ];
        normalize(&mut rows, "demographics").unwrap();

        assert_eq!(rows[0].normalized_frac, Some(1.0));
        assert_eq!(rows[2].normalized_frac, Some(0.5));
        let expected = ((0.05f64 / 0.5).powi(2) + (0.25f64 * 0.1 / 0.25).powi(2)).sqrt();
        let error = rows[2].normalized_frac_error.unwrap();
        assert!((error - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_reference_share_fails() {
        let mut rows = vec![row("demographics", 0, 0.0, 0.0), row("customer", 0, 0.5, 0.1)];
        assert!(matches!(
            normalize(&mut rows, "demographics"),
            Err(ClusterError::ZeroReferenceFraction { cluster_id: 0, .. })
        ));
    }

    #[test]
    fn duplicate_reference_cluster_fails() {
        let mut rows = vec![
            row("demographics", 0, 0.5, 0.1),
            row("demographics", 0, 0.5, 0.1),
        ];
        assert!(matches!(
            normalize(&mut rows, "demographics"),
            Err(ClusterError::DuplicateReferenceCluster { cluster_id: 0, .. })
        ));
    }

    #[test]
    fn missing_reference_leaves_rows_untouched() {
        let mut rows = vec![
            row("demographics", 0, 1.0, 0.1),
            row("customer", 0, 0.5, 0.1),
            row("customer", 7, 0.5, 0.1),
        ];
        let before = rows.clone();
        assert!(matches!(
            normalize(&mut rows, "demographics"),
            Err(ClusterError::MissingReference { cluster_id: 7, .. })
        ));
        assert_eq!(rows, before);
    }

    #[test]
    fn compare_rejects_bad_groups() {
        assert!(matches!(
            compare_clusters(&[0], &[0], ["a", "a"], "a"),
            Err(ClusterError::DuplicateGroup { .. })
        ));
        assert!(matches!(
            compare_clusters(&[0], &[0], ["a", "b"], "c"),
            Err(ClusterError::UnknownReferenceGroup { .. })
        ));
    }

    #[test]
    fn comparison_frames() {
        let comparison =
            compare_clusters(&[0, 1, 1], &[0, 0, 1, 1], ["customer", "demographics"], "demographics")
                .unwrap();
        assert_eq!(comparison.rows().len(), 4);
        assert_eq!(comparison.groups(), &["customer".to_string(), "demographics".to_string()]);
        assert_eq!(comparison.reference_group(), "demographics");
        assert_eq!(comparison.group_rows("customer").count(), 2);

        let long = comparison.to_long_dataframe().unwrap();
        assert_eq!(long.shape(), (4, 8));
        assert_eq!(
            long.column("group").unwrap().get(2).unwrap(),
            AnyValue::String("demographics")
        );

        let wide = comparison.to_wide_dataframe().unwrap();
        assert_eq!(wide.shape(), (2, 13));
        assert_eq!(
            wide.column("count_customer").unwrap().get(1).unwrap(),
            AnyValue::UInt64(2)
        );
        assert_eq!(
            wide.column("normalized_frac_demographics").unwrap().get(0).unwrap(),
            AnyValue::Float64(1.0)
        );
    }
}
