//! Per-cluster counts with Poisson errors.

use std::collections::{BTreeMap, BTreeSet};

use seg_model::ClusterCountRow;

use crate::error::{ClusterError, Result};

/// Largest accepted deviation of the summed shares from 1.
pub const FRACTION_SUM_TOLERANCE: f64 = 1e-9;

/// Count cluster membership for one group.
///
/// Emits one row per id in `all_cluster_ids`, in that order, including ids
/// with no members in `labels`. Every label must be one of those ids.
///
/// # Examples
///
/// ```
/// use seg_cluster::aggregate_counts;
///
/// let rows = aggregate_counts(&[0, 0, 1, 2, 2, 2], &[0, 1, 2, 3]).unwrap();
/// let counts: Vec<u64> = rows.iter().map(|row| row.count).collect();
/// assert_eq!(counts, vec![2, 1, 3, 0]);
/// ```
pub fn aggregate_counts(labels: &[usize], all_cluster_ids: &[usize]) -> Result<Vec<ClusterCountRow>> {
    if labels.is_empty() {
        return Err(ClusterError::EmptyAssignment);
    }

    let mut counter: BTreeMap<usize, u64> = BTreeMap::new();
    for &label in labels {
        *counter.entry(label).or_default() += 1;
    }

    let total = labels.len() as f64;
    let rows: Vec<ClusterCountRow> = all_cluster_ids
        .iter()
        .map(|&cluster_id| {
            let count = counter.get(&cluster_id).copied().unwrap_or(0);
            if count == 0 {
                tracing::warn!(cluster_id, "Cluster has no members in this group");
            }
            let count_error = (count as f64).sqrt();
            ClusterCountRow {
                cluster_id,
                count,
                count_error,
                frac: count as f64 / total,
                frac_error: count_error / total,
            }
        })
        .collect();

    let counted: u64 = rows.iter().map(|row| row.count).sum();
    if counted != labels.len() as u64 {
        return Err(ClusterError::Invariant {
            message: format!(
                "counts sum to {counted} but {} labels were given",
                labels.len()
            ),
        });
    }
    let frac_sum: f64 = rows.iter().map(|row| row.frac).sum();
    if (frac_sum - 1.0).abs() > FRACTION_SUM_TOLERANCE {
        return Err(ClusterError::Invariant {
            message: format!("fractions sum to {frac_sum}, not 1"),
        });
    }

    Ok(rows)
}

/// Sorted, de-duplicated union of two label sets.
pub fn union_cluster_ids(first: &[usize], second: &[usize]) -> Vec<usize> {
    first
        .iter()
        .chain(second)
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
