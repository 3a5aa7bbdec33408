//! Seeded k-means, the default centroid-based partitioner.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::error::Result;
use super::partition::{Partitioner, check_request};

/// Lloyd's k-means with k-means++ seeding and random restarts.
///
/// The convergence tolerance is relative: iterations stop once the squared
/// centroid shift falls below `tol` times the mean per-dimension variance
/// of the data.
///
/// # Examples
///
/// ```
/// use loadshape_cluster::cluster::kmeans::KMeans;
/// use loadshape_cluster::cluster::partition::Partitioner;
///
/// let points = vec![vec![0.0], vec![0.1], vec![10.0], vec![10.1]];
/// let labels = KMeans::default().partition(&points, 2, 7).unwrap();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    /// Maximum Lloyd iterations per restart.
    pub max_iter: usize,
    /// Number of restarts; the lowest-inertia result is kept.
    pub n_init: usize,
    /// Relative convergence tolerance.
    pub tol: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            max_iter: 300,
            n_init: 10,
            tol: 1e-4,
        }
    }
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Group per input point, in `[0, k)`.
    pub labels: Vec<usize>,
    /// Final centroids, one per group.
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances from points to their centroid.
    pub inertia: f64,
    /// Lloyd iterations used by the kept restart.
    pub n_iter: usize,
}

impl KMeans {
    /// Creates a k-means partitioner with explicit parameters.
    ///
    /// `max_iter` and `n_init` are clamped to at least 1.
    pub fn new(max_iter: usize, n_init: usize, tol: f64) -> Self {
        Self {
            max_iter: max_iter.max(1),
            n_init: n_init.max(1),
            tol: tol.max(0.0),
        }
    }

    /// Fits `k` centroids to `points`.
    ///
    /// # Errors
    ///
    /// Propagates the request checks of [`check_request`].
    pub fn fit(&self, points: &[Vec<f64>], k: usize, seed: u64) -> Result<KMeansFit> {
        check_request(points, k)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let threshold = self.tol * mean_variance(points);

        let mut best = self.lloyd(points, k, threshold, &mut rng);
        for _ in 1..self.n_init {
            let fit = self.lloyd(points, k, threshold, &mut rng);
            if fit.inertia < best.inertia {
                best = fit;
            }
        }

        debug!(
            points = points.len(),
            k,
            inertia = best.inertia,
            n_iter = best.n_iter,
            "k-means converged"
        );
        Ok(best)
    }

    fn lloyd(&self, points: &[Vec<f64>], k: usize, threshold: f64, rng: &mut StdRng) -> KMeansFit {
        let mut centroids = plus_plus_init(points, k, rng);
        let mut labels = vec![0; points.len()];
        let mut n_iter = 0;

        for iter in 1..=self.max_iter.max(1) {
            n_iter = iter;
            assign(points, &centroids, &mut labels);
            let updated = update_centroids(points, &centroids, &mut labels, k);
            let shift: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(a, b)| squared_distance(a, b))
                .sum();
            centroids = updated;
            if shift <= threshold {
                break;
            }
        }

        let inertia = assign(points, &centroids, &mut labels);
        KMeansFit {
            labels,
            centroids,
            inertia,
            n_iter,
        }
    }
}

impl Partitioner for KMeans {
    fn partition(&self, points: &[Vec<f64>], k: usize, seed: u64) -> Result<Vec<usize>> {
        self.fit(points, k, seed).map(|fit| fit.labels)
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index and squared distance of the nearest centroid; ties go to the lower index.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (j, c) in centroids.iter().enumerate() {
        let d = squared_distance(point, c);
        if d < best.1 {
            best = (j, d);
        }
    }
    best
}

/// Assigns every point to its nearest centroid and returns the inertia.
fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize]) -> f64 {
    let mut inertia = 0.0;
    for (label, point) in labels.iter_mut().zip(points) {
        let (j, d) = nearest(point, centroids);
        *label = j;
        inertia += d;
    }
    inertia
}

/// Recomputes centroids as member means.
///
/// An empty group takes over the point farthest from its current centroid,
/// and that point's label is moved with it.
fn update_centroids(
    points: &[Vec<f64>],
    previous: &[Vec<f64>],
    labels: &mut [usize],
    k: usize,
) -> Vec<Vec<f64>> {
    let dim = points[0].len();
    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0_usize; k];
    for (point, &label) in points.iter().zip(labels.iter()) {
        counts[label] += 1;
        for (s, v) in sums[label].iter_mut().zip(point) {
            *s += v;
        }
    }

    for j in 0..k {
        if counts[j] > 0 {
            continue;
        }
        let farthest = points
            .iter()
            .enumerate()
            .filter(|(i, _)| counts[labels[*i]] > 1)
            .map(|(i, p)| (i, squared_distance(p, &previous[labels[i]])))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);
        let Some(i) = farthest else { continue };

        let from = labels[i];
        counts[from] -= 1;
        for (s, v) in sums[from].iter_mut().zip(&points[i]) {
            *s -= v;
        }
        labels[i] = j;
        counts[j] = 1;
        sums[j] = points[i].clone();
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|((sum, count), prev)| {
            if count == 0 {
                prev.clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect()
}

/// k-means++ seeding: each new centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen one.
fn plus_plus_init(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())].clone());

    let mut min_dist: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = min_dist.iter().sum();
        let chosen = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            let mut acc = 0.0;
            let mut chosen = None;
            for (i, d) in min_dist.iter().enumerate() {
                if *d <= 0.0 {
                    continue;
                }
                acc += d;
                chosen = Some(i);
                if acc >= target {
                    break;
                }
            }
            chosen.unwrap_or(0)
        } else {
            rng.random_range(0..points.len())
        };

        let centroid = points[chosen].clone();
        for (d, p) in min_dist.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

fn mean_variance(points: &[Vec<f64>]) -> f64 {
    let n = points.len() as f64;
    let dim = points[0].len();
    if dim == 0 {
        return 0.0;
    }
    let total: f64 = (0..dim)
        .map(|j| {
            let mean = points.iter().map(|p| p[j]).sum::<f64>() / n;
            points.iter().map(|p| (p[j] - mean).powi(2)).sum::<f64>() / n
        })
        .sum();
    total / dim as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::error::ClusterError;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.2, 0.1],
            vec![0.1, 0.3],
            vec![5.0, 5.0],
            vec![5.2, 4.9],
            vec![4.8, 5.1],
            vec![10.0, 0.0],
            vec![10.1, 0.2],
        ]
    }

    #[test]
    fn separates_well_spaced_blobs() {
        let labels = KMeans::default().partition(&blobs(), 3, 42).unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_eq!(labels[6], labels[7]);
        assert_ne!(labels[0], labels[3]);
        assert_ne!(labels[0], labels[6]);
        assert_ne!(labels[3], labels[6]);
    }

    #[test]
    fn labels_are_in_range() {
        let labels = KMeans::default().partition(&blobs(), 4, 1).unwrap();
        assert_eq!(labels.len(), 8);
        assert!(labels.iter().all(|&l| l < 4));
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let km = KMeans::default();
        let a = km.fit(&blobs(), 3, 99).unwrap();
        let b = km.fit(&blobs(), 3, 99).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn k_equal_to_n_gives_each_point_its_own_group() {
        let points = vec![vec![0.0], vec![1.0], vec![2.0]];
        let fit = KMeans::default().fit(&points, 3, 5).unwrap();
        let mut labels = fit.labels.clone();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 3);
        assert!(fit.inertia.abs() < 1e-12);
    }

    #[test]
    fn single_group_centroid_is_mean() {
        let points = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let fit = KMeans::default().fit(&points, 1, 0).unwrap();
        assert_eq!(fit.labels, vec![0, 0]);
        assert_eq!(fit.centroids, vec![vec![2.0, 3.0]]);
    }

    #[test]
    fn too_many_groups_is_insufficient_data() {
        let err = KMeans::default()
            .partition(&[vec![0.0], vec![1.0]], 3, 0)
            .unwrap_err();
        assert_eq!(err, ClusterError::insufficient_data(3, 2));
    }

    #[test]
    fn update_relocates_empty_group() {
        let points = vec![vec![0.0], vec![1.0], vec![9.0]];
        let previous = vec![vec![0.5], vec![100.0]];
        let mut labels = vec![0, 0, 0];
        let centroids = update_centroids(&points, &previous, &mut labels, 2);
        assert_eq!(labels, vec![0, 0, 1]);
        assert_eq!(centroids, vec![vec![0.5], vec![9.0]]);
    }
}
