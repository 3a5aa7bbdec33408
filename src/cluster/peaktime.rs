//! Stage 2: clustering by peak timing within each consumption group.

use tracing::{debug, warn};

use super::consumption::ConsumptionClusters;
use super::error::{ClusterError, Result};
use super::partition::{Partitioner, check_assignment};

/// Seed offset separating stage-2 draws from the stage-1 draw.
pub const PEAKTIME_SEED_OFFSET: u64 = 57;

/// Stage-2 assignment local to one consumption group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakTimeGroup {
    /// Consumption group these rows belong to.
    pub group: usize,
    /// Original batch indices of the member rows, in selection order.
    pub indices: Vec<usize>,
    /// Peak-time label per member row, in `[0, k_peaktime)`.
    pub labels: Vec<usize>,
}

/// Seed used for the stage-2 partition of `group`.
pub fn peaktime_seed(seed: u64, group: usize) -> u64 {
    seed.wrapping_add(PEAKTIME_SEED_OFFSET)
        .wrapping_add(group as u64)
}

/// Sub-clusters every non-empty consumption group on its normalized shapes.
///
/// Groups are visited in ascending order and empty groups are skipped.
///
/// # Errors
///
/// Returns `ClusterError::InsufficientData`, tagged with the group index,
/// when a group has fewer than `k_peaktime` members or distinct shapes.
pub fn cluster_peak_times<P>(
    clusters: &ConsumptionClusters,
    k_peaktime: usize,
    partitioner: &P,
    seed: u64,
) -> Result<Vec<PeakTimeGroup>>
where
    P: Partitioner + ?Sized,
{
    if k_peaktime == 0 {
        return Err(ClusterError::invalid_input("k_peaktime must be > 0"));
    }

    let mut groups = Vec::with_capacity(clusters.k);
    for group in 0..clusters.k {
        let rows = clusters.group(group);
        if rows.is_empty() {
            warn!(group, "consumption group is empty, skipping peak-time clustering");
            continue;
        }
        if rows.len() < k_peaktime {
            return Err(ClusterError::insufficient_data(k_peaktime, rows.len()).in_group(group));
        }

        let shapes: Vec<Vec<f64>> = rows.iter().map(|r| r.shape.to_vec()).collect();
        let labels = partitioner
            .partition(&shapes, k_peaktime, peaktime_seed(seed, group))
            .map_err(|e| e.in_group(group))?;
        check_assignment(&labels, shapes.len(), k_peaktime).map_err(|e| e.in_group(group))?;

        debug!(group, members = rows.len(), k_peaktime, "peak-time clustering done");
        groups.push(PeakTimeGroup {
            group,
            indices: rows.iter().map(|r| r.index).collect(),
            labels,
        });
    }

    Ok(groups)
}
