//! Feature engineering for stage-1 clustering.

use tracing::debug;

use super::error::{ClusterError, Result};
use super::integrate::integrate;
use crate::profile::LoadBatch;

/// Per-load features derived from a [`LoadBatch`].
///
/// All vectors are indexed by the row position in the source batch.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    /// Maximum raw power per row.
    pub max_power: Vec<f64>,
    /// Sum of raw readings per row.
    pub total_power: Vec<f64>,
    /// Each row divided by its own total; rows sum to 1.
    pub normalized: Vec<Vec<f64>>,
    /// Cumulative integral of each normalized row, `L - 1` columns.
    pub integrated: Vec<Vec<f64>>,
    /// `integrated` with `max_power` appended, `L` columns.
    pub features: Vec<Vec<f64>>,
}

impl FeatureSet {
    /// Normalizes the batch and derives the integrated-shape features.
    ///
    /// Rows are integrated with a sample spacing of `24 / L` hours.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::DegenerateRow` for the first row whose total
    /// energy is zero, and `ClusterError::InvalidInput` for a row whose
    /// total overflows.
    pub fn build(batch: &LoadBatch) -> Result<Self> {
        let dx = batch.interval_hours();
        let n = batch.len();

        let mut max_power = Vec::with_capacity(n);
        let mut total_power = Vec::with_capacity(n);
        let mut normalized = Vec::with_capacity(n);
        let mut integrated = Vec::with_capacity(n);
        let mut features = Vec::with_capacity(n);

        for (row_idx, row) in batch.rows().iter().enumerate() {
            let total: f64 = row.iter().sum();
            if !total.is_finite() {
                return Err(ClusterError::invalid_input(format!(
                    "row {row_idx} total energy is not finite"
                )));
            }
            if total <= 0.0 {
                return Err(ClusterError::DegenerateRow { row: row_idx });
            }
            let peak = row.iter().copied().fold(0.0_f64, f64::max);

            let norm: Vec<f64> = row.iter().map(|v| v / total).collect();
            let integral = integrate(&norm, dx)?;

            let mut feature = Vec::with_capacity(integral.len() + 1);
            feature.extend_from_slice(&integral);
            feature.push(peak);

            max_power.push(peak);
            total_power.push(total);
            normalized.push(norm);
            integrated.push(integral);
            features.push(feature);
        }

        debug!(
            rows = n,
            steps_per_day = batch.steps_per_day(),
            dx_hours = dx,
            "built load shape features"
        );

        Ok(Self {
            max_power,
            total_power,
            normalized,
            integrated,
            features,
        })
    }

    /// Number of loads described.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when no loads are described.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(rows: Vec<Vec<f64>>) -> LoadBatch {
        LoadBatch::new(rows).unwrap()
    }

    #[test]
    fn normalized_rows_sum_to_one() {
        let b = batch(vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![0.1, 0.0, 0.0, 9.0],
            vec![5.0; 4],
        ]);
        let fs = FeatureSet::build(&b).unwrap();
        for row in &fs.normalized {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn feature_shapes() {
        let b = batch(vec![vec![1.0; 96]; 3]);
        let fs = FeatureSet::build(&b).unwrap();
        assert_eq!(fs.len(), 3);
        assert!(fs.integrated.iter().all(|r| r.len() == 95));
        assert!(fs.features.iter().all(|r| r.len() == 96));
    }

    #[test]
    fn last_feature_column_is_raw_peak() {
        let b = batch(vec![vec![1.0, 7.0, 2.0, 0.0]]);
        let fs = FeatureSet::build(&b).unwrap();
        assert_eq!(fs.max_power, vec![7.0]);
        assert_eq!(fs.total_power, vec![10.0]);
        assert_eq!(fs.features[0].last().copied(), Some(7.0));
    }

    #[test]
    fn integrates_with_day_interval() {
        // L = 4 → dx = 6h; normalized [0.25; 4] integrates to 1.5, 3.0, 4.5
        let b = batch(vec![vec![1.0; 4]]);
        let fs = FeatureSet::build(&b).unwrap();
        assert_eq!(fs.integrated[0], vec![1.5, 3.0, 4.5]);
    }

    #[test]
    fn early_and_late_peaks_have_different_integrals() {
        let b = batch(vec![vec![4.0, 0.0, 0.0, 0.0], vec![0.0, 0.0, 0.0, 4.0]]);
        let fs = FeatureSet::build(&b).unwrap();
        assert_ne!(fs.integrated[0], fs.integrated[1]);
        assert!(fs.integrated[0][0] > fs.integrated[1][0]);
    }

    #[test]
    fn zero_row_is_degenerate() {
        let b = batch(vec![vec![1.0; 4], vec![0.0; 4]]);
        let err = FeatureSet::build(&b).unwrap_err();
        assert_eq!(err, ClusterError::DegenerateRow { row: 1 });
    }

    #[test]
    fn overflowing_row_total_is_rejected() {
        let b = batch(vec![vec![1e308, 1e308, 0.0, 0.0], vec![1.0; 4]]);
        let err = FeatureSet::build(&b).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput { .. }));
        assert!(err.to_string().contains("row 0"));
    }
}
