//! Stage 1: clustering by integrated consumption shape.

use tracing::debug;

use super::error::{ClusterError, Result};
use super::features::FeatureSet;
use super::partition::{Partitioner, check_assignment};
use crate::profile::LoadBatch;

/// Stage-1 labels carried alongside the normalized shapes they were
/// derived from, ready to be split per group for stage 2.
#[derive(Debug, Clone)]
pub struct ConsumptionClusters {
    /// Number of requested consumption groups.
    pub k: usize,
    /// Group per load, in batch order.
    pub labels: Vec<usize>,
    /// Normalized shape per load, in batch order.
    pub normalized: Vec<Vec<f64>>,
}

/// One normalized row selected for a stage-1 group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeRow<'a> {
    /// Row position in the source batch.
    pub index: usize,
    /// Normalized load shape.
    pub shape: &'a [f64],
}

impl ConsumptionClusters {
    /// Rows assigned to `group`, in their original relative order.
    pub fn group(&self, group: usize) -> Vec<ShapeRow<'_>> {
        self.labels
            .iter()
            .zip(&self.normalized)
            .enumerate()
            .filter(|(_, (label, _))| **label == group)
            .map(|(index, (_, shape))| ShapeRow {
                index,
                shape: shape.as_slice(),
            })
            .collect()
    }

    /// Member count per group, indexed by group.
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Assigns each load in `batch` to one of `k` consumption groups.
///
/// Groups are formed on the integrated normalized shape with the raw peak
/// appended. Group ids carry no ordering meaning.
///
/// # Errors
///
/// Returns `ClusterError::DegenerateRow` for zero-energy rows and
/// `ClusterError::InsufficientData` when the batch cannot be split into `k`
/// groups.
pub fn cluster_by_consumption<P>(
    batch: &LoadBatch,
    k: usize,
    partitioner: &P,
    seed: u64,
) -> Result<Vec<usize>>
where
    P: Partitioner + ?Sized,
{
    cluster_by_consumption_with_shapes(batch, k, partitioner, seed).map(|c| c.labels)
}

/// Like [`cluster_by_consumption`], but also returns the normalized shapes
/// needed for peak-time clustering.
///
/// # Errors
///
/// See [`cluster_by_consumption`].
pub fn cluster_by_consumption_with_shapes<P>(
    batch: &LoadBatch,
    k: usize,
    partitioner: &P,
    seed: u64,
) -> Result<ConsumptionClusters>
where
    P: Partitioner + ?Sized,
{
    if k == 0 {
        return Err(ClusterError::invalid_input("k_consumption must be > 0"));
    }

    let features = FeatureSet::build(batch)?;
    let labels = partitioner.partition(&features.features, k, seed)?;
    check_assignment(&labels, features.len(), k)?;

    let clusters = ConsumptionClusters {
        k,
        labels,
        normalized: features.normalized,
    };
    debug!(k, sizes = ?clusters.group_sizes(), "consumption clustering done");
    Ok(clusters)
}
