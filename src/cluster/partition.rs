//! The partition-into-k-groups capability used by both clustering stages.

use std::collections::HashSet;

use super::error::{ClusterError, Result};

/// Partitions points into `k` groups.
///
/// Implementations must return one label in `[0, k)` per input point, in
/// input order, and must be deterministic for a fixed `seed`. No guarantee
/// is made about which physical group receives which label.
pub trait Partitioner {
    /// Assigns each point to one of `k` groups.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::InsufficientData` when fewer than `k` distinct
    /// points are available, and `ClusterError::InvalidInput` for `k == 0` or
    /// ragged points.
    fn partition(&self, points: &[Vec<f64>], k: usize, seed: u64) -> Result<Vec<usize>>;
}

impl<P: Partitioner + ?Sized> Partitioner for &P {
    fn partition(&self, points: &[Vec<f64>], k: usize, seed: u64) -> Result<Vec<usize>> {
        (**self).partition(points, k, seed)
    }
}

/// Validates a partition request shared by every implementation.
///
/// Checks that `k > 0`, that all points share a dimension, and that there
/// are at least `k` points and at least `k` distinct points.
pub fn check_request(points: &[Vec<f64>], k: usize) -> Result<()> {
    if k == 0 {
        return Err(ClusterError::invalid_input("cluster count k must be > 0"));
    }
    if points.len() < k {
        return Err(ClusterError::insufficient_data(k, points.len()));
    }
    if let Some(first) = points.first() {
        if let Some(i) = points.iter().position(|p| p.len() != first.len()) {
            return Err(ClusterError::invalid_input(format!(
                "point {i} has dimension {}, expected {}",
                points[i].len(),
                first.len()
            )));
        }
    }
    let distinct = distinct_points(points);
    if distinct < k {
        return Err(ClusterError::insufficient_data(k, distinct));
    }
    Ok(())
}

/// Checks that a partitioner returned one in-range label per point.
pub(crate) fn check_assignment(labels: &[usize], n: usize, k: usize) -> Result<()> {
    if labels.len() != n {
        return Err(ClusterError::invalid_input(format!(
            "partitioner returned {} labels for {n} points",
            labels.len()
        )));
    }
    if let Some(bad) = labels.iter().find(|&&l| l >= k) {
        return Err(ClusterError::invalid_input(format!(
            "partitioner returned label {bad} outside [0, {k})"
        )));
    }
    Ok(())
}

/// Number of bitwise-distinct points (with `-0.0` folded onto `0.0`).
pub fn distinct_points(points: &[Vec<f64>]) -> usize {
    points
        .iter()
        .map(|p| p.iter().map(|v| (v + 0.0).to_bits()).collect::<Vec<u64>>())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_k_is_invalid() {
        let err = check_request(&[vec![1.0]], 0).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput { .. }));
    }

    #[test]
    fn more_groups_than_points_is_insufficient() {
        let err = check_request(&[vec![1.0], vec![2.0]], 3).unwrap_err();
        assert_eq!(err, ClusterError::insufficient_data(3, 2));
    }

    #[test]
    fn duplicates_do_not_count_as_groupable() {
        let points = vec![vec![1.0, 1.0]; 5];
        assert_eq!(distinct_points(&points), 1);
        assert_eq!(
            check_request(&points, 2).unwrap_err(),
            ClusterError::insufficient_data(2, 1)
        );
        assert!(check_request(&points, 1).is_ok());
    }

    #[test]
    fn assignment_check_catches_bad_partitioners() {
        assert!(check_assignment(&[0, 1], 2, 2).is_ok());
        assert!(check_assignment(&[0], 2, 2).is_err());
        assert!(check_assignment(&[0, 2], 2, 2).is_err());
    }

    #[test]
    fn ragged_points_are_invalid() {
        let err = check_request(&[vec![1.0, 2.0], vec![1.0]], 1).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput { .. }));
    }
}
