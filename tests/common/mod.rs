//! Shared test fixtures for integration tests.

use loadshape_cluster::cluster::ClusterError;
use loadshape_cluster::cluster::partition::{Partitioner, check_request};
use loadshape_cluster::profile::LoadBatch;
use loadshape_cluster::profile::synthetic::ProfileGenerator;

/// Deterministic partitioner: ranks points by their first coordinate and
/// splits the ranking into `k` contiguous, near-equal slices.
///
/// Ignores the seed, so pipeline tests do not depend on k-means behaviour.
#[derive(Debug, Default, Clone, Copy)]
pub struct RankPartitioner;

impl Partitioner for RankPartitioner {
    fn partition(&self, points: &[Vec<f64>], k: usize, _seed: u64) -> Result<Vec<usize>, ClusterError> {
        check_request(points, k)?;
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| points[a][0].total_cmp(&points[b][0]).then(a.cmp(&b)));

        let mut labels = vec![0; points.len()];
        for (rank, &i) in order.iter().enumerate() {
            labels[i] = rank * k / points.len();
        }
        Ok(labels)
    }
}

/// Partitioner that places every point in group 0, whatever `k` is.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleGroupPartitioner;

impl Partitioner for SingleGroupPartitioner {
    fn partition(&self, points: &[Vec<f64>], k: usize, _seed: u64) -> Result<Vec<usize>, ClusterError> {
        if k == 0 {
            return Err(ClusterError::invalid_input("k must be > 0"));
        }
        Ok(vec![0; points.len()])
    }
}

/// Hourly profile peaking at `peak_hour` with the given magnitudes, no noise.
pub fn peaked_profile(base_kw: f64, peak_kw: f64, peak_hour: f64) -> Vec<f64> {
    ProfileGenerator::new(base_kw, peak_kw, peak_hour, 1.0, 0.0, 24, 0).profile()
}

/// Eight hourly profiles: two magnitudes × two peak times, two of each.
///
/// Rows alternate between archetypes so groups are interleaved in batch order.
pub fn four_archetype_batch() -> LoadBatch {
    let archetypes = [
        (0.2, 1.0, 7.0),
        (3.0, 8.0, 7.0),
        (0.2, 1.0, 19.0),
        (3.0, 8.0, 19.0),
    ];
    let rows = (0..8)
        .map(|i| {
            let (base, peak, hour) = archetypes[i % 4];
            // Small jitter keeps every row distinct.
            peaked_profile(base + 0.01 * (i / 4) as f64, peak, hour)
        })
        .collect();
    LoadBatch::new(rows).expect("fixture batch should be valid")
}
