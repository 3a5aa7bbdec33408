//! Post-hoc description of composite clusters.

use std::collections::BTreeMap;
use std::fmt;

use super::error::{ClusterError, Result};
use super::labels::TwoStageAssignment;
use crate::profile::LoadBatch;

/// Aggregate description of one composite cluster.
#[derive(Debug, Clone)]
pub struct ClusterStats {
    /// Composite label.
    pub label: usize,
    /// Stage-1 group.
    pub consumption: usize,
    /// Stage-2 group.
    pub peaktime: usize,
    /// Number of member loads.
    pub members: usize,
    /// Mean normalized shape of the members.
    pub mean_shape: Vec<f64>,
    /// Reading index at which `mean_shape` peaks.
    pub peak_step: usize,
    /// Hour of day at which `mean_shape` peaks.
    pub peak_hour: f64,
    /// Mean daily energy of the members (kWh).
    pub mean_energy_kwh: f64,
}

/// Report over all non-empty composite clusters, ordered by label.
///
/// Computed from the source batch and a finished assignment so that the
/// reported shapes always match the emitted labels.
#[derive(Debug, Clone)]
pub struct ClusterSummary {
    /// Number of consumption groups requested.
    pub k_consumption: usize,
    /// Number of peak-time groups requested.
    pub k_peaktime: usize,
    /// Number of labelled loads.
    pub loads: usize,
    /// Non-empty clusters in ascending label order.
    pub clusters: Vec<ClusterStats>,
}

impl ClusterSummary {
    /// Builds the report.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::InvalidInput` if the assignment refers to rows
    /// outside `batch`, and `ClusterError::DegenerateRow` for a zero-energy
    /// member row.
    pub fn from_assignment(batch: &LoadBatch, assignment: &TwoStageAssignment) -> Result<Self> {
        let steps = batch.steps_per_day();
        let dt = batch.interval_hours();
        let mut acc: BTreeMap<usize, ClusterStats> = BTreeMap::new();

        for entry in assignment.entries() {
            let row = batch.row(entry.index).ok_or_else(|| {
                ClusterError::invalid_input(format!(
                    "assignment refers to row {} of a {}-row batch",
                    entry.index,
                    batch.len()
                ))
            })?;
            let total: f64 = row.iter().sum();
            if !total.is_finite() {
                return Err(ClusterError::invalid_input(format!(
                    "row {} total energy is not finite",
                    entry.index
                )));
            }
            if total <= 0.0 {
                return Err(ClusterError::DegenerateRow { row: entry.index });
            }

            let stats = acc.entry(entry.label).or_insert_with(|| ClusterStats {
                label: entry.label,
                consumption: entry.consumption,
                peaktime: entry.peaktime,
                members: 0,
                mean_shape: vec![0.0; steps],
                peak_step: 0,
                peak_hour: 0.0,
                mean_energy_kwh: 0.0,
            });
            stats.members += 1;
            stats.mean_energy_kwh += total * dt;
            for (m, v) in stats.mean_shape.iter_mut().zip(row) {
                *m += v / total;
            }
        }

        let clusters = acc
            .into_values()
            .map(|mut stats| {
                let n = stats.members as f64;
                stats.mean_energy_kwh /= n;
                for m in &mut stats.mean_shape {
                    *m /= n;
                }
                stats.peak_step = stats
                    .mean_shape
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1).then(b.0.cmp(&a.0)))
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                stats.peak_hour = stats.peak_step as f64 * dt;
                stats
            })
            .collect();

        Ok(Self {
            k_consumption: assignment.k_consumption,
            k_peaktime: assignment.k_peaktime,
            loads: assignment.len(),
            clusters,
        })
    }
}

impl fmt::Display for ClusterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Cluster Report ---")?;
        writeln!(
            f,
            "Loads: {}  k_consumption: {}  k_peaktime: {}  clusters used: {}/{}",
            self.loads,
            self.k_consumption,
            self.k_peaktime,
            self.clusters.len(),
            self.k_consumption * self.k_peaktime
        )?;
        write!(f, "label  cons  peak  members  peak_hr  mean_kWh")?;
        for c in &self.clusters {
            write!(
                f,
                "\n{:>5}  {:>4}  {:>4}  {:>7}  {:>7.2}  {:>8.2}",
                c.label, c.consumption, c.peaktime, c.members, c.peak_hour, c.mean_energy_kwh
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::peaktime::PeakTimeGroup;

    fn fixture() -> (LoadBatch, TwoStageAssignment) {
        let batch = LoadBatch::new(vec![
            vec![4.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 4.0],
            vec![2.0, 0.0, 0.0, 0.0],
        ])
        .unwrap();
        let groups = vec![PeakTimeGroup {
            group: 0,
            indices: vec![0, 1, 2],
            labels: vec![0, 1, 0],
        }];
        (batch, TwoStageAssignment::compose(&groups, 1, 2))
    }

    #[test]
    fn members_and_energy() {
        let (batch, assignment) = fixture();
        let summary = ClusterSummary::from_assignment(&batch, &assignment).unwrap();
        assert_eq!(summary.clusters.len(), 2);
        assert_eq!(summary.clusters[0].members, 2);
        // dt = 6h: (4*6 + 2*6) / 2
        assert!((summary.clusters[0].mean_energy_kwh - 18.0).abs() < 1e-12);
        assert_eq!(summary.clusters[1].members, 1);
    }

    #[test]
    fn peak_hour_of_mean_shape() {
        let (batch, assignment) = fixture();
        let summary = ClusterSummary::from_assignment(&batch, &assignment).unwrap();
        assert_eq!(summary.clusters[0].peak_step, 0);
        assert_eq!(summary.clusters[1].peak_step, 3);
        assert_eq!(summary.clusters[1].peak_hour, 18.0);
        assert_eq!(summary.clusters[0].mean_shape, vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_assignment_for_other_batch() {
        let (_, assignment) = fixture();
        let small = LoadBatch::new(vec![vec![1.0; 4]]).unwrap();
        assert!(ClusterSummary::from_assignment(&small, &assignment).is_err());
    }

    #[test]
    fn display_lists_each_cluster() {
        let (batch, assignment) = fixture();
        let summary = ClusterSummary::from_assignment(&batch, &assignment).unwrap();
        let text = summary.to_string();
        assert!(text.starts_with("--- Cluster Report ---"));
        assert!(text.contains("clusters used: 2/2"));
        assert_eq!(text.lines().count(), 5);
    }
}
