//! Two-stage clustering entry points.

use tracing::info;

use super::consumption::cluster_by_consumption_with_shapes;
use super::error::{ClusterError, Result};
use super::labels::TwoStageAssignment;
use super::partition::Partitioner;
use super::peaktime::cluster_peak_times;
use crate::profile::LoadBatch;

/// Clusters `batch` by consumption, then by peak time within each
/// consumption group, and returns the full assignment.
///
/// Stage 1 partitions with `seed`; stage 2 derives a per-group seed from it
/// (see [`super::peaktime::peaktime_seed`]), so a fixed seed reproduces the
/// same assignment.
///
/// # Errors
///
/// * `ClusterError::InvalidInput` if either `k` is zero
/// * `ClusterError::DegenerateRow` if a row has zero total energy
/// * `ClusterError::InsufficientData` if the batch or any consumption group
///   cannot be split into the requested number of groups
pub fn two_stage_assign<P>(
    batch: &LoadBatch,
    k_consumption: usize,
    k_peaktime: usize,
    partitioner: &P,
    seed: u64,
) -> Result<TwoStageAssignment>
where
    P: Partitioner + ?Sized,
{
    if k_consumption == 0 || k_peaktime == 0 {
        return Err(ClusterError::invalid_input(format!(
            "cluster counts must be > 0, got k_consumption={k_consumption}, k_peaktime={k_peaktime}"
        )));
    }

    let consumption = cluster_by_consumption_with_shapes(batch, k_consumption, partitioner, seed)?;
    let groups = cluster_peak_times(&consumption, k_peaktime, partitioner, seed)?;
    let assignment = TwoStageAssignment::compose(&groups, k_consumption, k_peaktime);

    info!(
        loads = assignment.len(),
        k_consumption,
        k_peaktime,
        clusters_used = assignment.clusters_used(),
        "two-stage clustering complete"
    );
    Ok(assignment)
}

/// Composite labels from [`two_stage_assign`], in grouped order.
///
/// Labels are concatenated by ascending consumption group, so they are only
/// aligned with `batch` within a group. Use
/// [`TwoStageAssignment::aligned_labels`] for batch-order labels.
///
/// # Errors
///
/// See [`two_stage_assign`].
pub fn two_stage_cluster<P>(
    batch: &LoadBatch,
    k_consumption: usize,
    k_peaktime: usize,
    partitioner: &P,
    seed: u64,
) -> Result<Vec<usize>>
where
    P: Partitioner + ?Sized,
{
    two_stage_assign(batch, k_consumption, k_peaktime, partitioner, seed).map(|a| a.labels())
}
