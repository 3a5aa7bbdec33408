//! Validated batch of daily load profiles.

use crate::cluster::error::{ClusterError, Result};

/// Hours covered by one load profile.
pub const HOURS_PER_DAY: f64 = 24.0;

/// An immutable N×L batch of load profiles, one row per metered load.
///
/// Every row has the same length `L` and holds finite, non-negative power
/// readings sampled at a uniform interval of `24 / L` hours.
///
/// # Examples
///
/// ```
/// use loadshape_cluster::profile::LoadBatch;
///
/// let batch = LoadBatch::new(vec![vec![1.0; 96], vec![2.0; 96]]).unwrap();
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batch.interval_hours(), 0.25);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBatch {
    rows: Vec<Vec<f64>>,
    steps_per_day: usize,
}

impl LoadBatch {
    /// Builds a batch, checking shape and reading validity.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::InvalidInput` if the batch is empty, a row is
    /// empty, rows differ in length, or any reading is negative or not finite.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(ClusterError::invalid_input("load batch has no rows"));
        };
        let steps_per_day = first.len();
        if steps_per_day == 0 {
            return Err(ClusterError::invalid_input("load profiles have no readings"));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != steps_per_day {
                return Err(ClusterError::invalid_input(format!(
                    "row {i} has {} readings, expected {steps_per_day}",
                    row.len()
                )));
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite() || *v < 0.0) {
                return Err(ClusterError::invalid_input(format!(
                    "row {i} reading {j} is {}, expected a finite non-negative value",
                    row[j]
                )));
            }
        }

        Ok(Self {
            rows,
            steps_per_day,
        })
    }

    /// Number of load profiles.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the batch holds no profiles; never the case after [`LoadBatch::new`].
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Readings per profile (`L`).
    pub fn steps_per_day(&self) -> usize {
        self.steps_per_day
    }

    /// Sample spacing in hours, `24 / L`.
    pub fn interval_hours(&self) -> f64 {
        HOURS_PER_DAY / self.steps_per_day as f64
    }

    /// Row-major view of the profiles.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Single profile by index.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_derives_from_row_length() {
        let batch = LoadBatch::new(vec![vec![1.0; 24]]).unwrap();
        assert_eq!(batch.interval_hours(), 1.0);
        assert_eq!(batch.steps_per_day(), 24);
    }

    #[test]
    fn rejects_empty_batch() {
        let err = LoadBatch::new(Vec::new()).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput { .. }));
    }

    #[test]
    fn rejects_zero_length_rows() {
        assert!(LoadBatch::new(vec![Vec::new()]).is_err());
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = LoadBatch::new(vec![vec![1.0; 4], vec![1.0; 3]]).unwrap_err();
        assert!(err.to_string().contains("row 1 has 3 readings"));
    }

    #[test]
    fn rejects_negative_and_nan_readings() {
        assert!(LoadBatch::new(vec![vec![1.0, -0.5]]).is_err());
        assert!(LoadBatch::new(vec![vec![1.0, f64::NAN]]).is_err());
    }

    #[test]
    fn zero_rows_are_accepted_at_construction() {
        // Degenerate rows are rejected later, during normalization.
        assert!(LoadBatch::new(vec![vec![0.0; 4]]).is_ok());
    }
}
