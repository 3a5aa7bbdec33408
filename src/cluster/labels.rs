//! Composition of stage-1 and stage-2 assignments into composite labels.

use std::fmt;

use super::peaktime::PeakTimeGroup;

/// Order in which composite labels are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelOrder {
    /// Concatenated by ascending consumption group, rows in selection order
    /// within a group. Not aligned with the input batch.
    #[default]
    Grouped,
    /// Scattered back to the row positions of the input batch.
    Original,
}

impl LabelOrder {
    /// Accepted configuration names.
    pub const NAMES: &[&str] = &["grouped", "original"];

    /// Parses a configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "grouped" => Some(Self::Grouped),
            "original" => Some(Self::Original),
            _ => None,
        }
    }
}

impl fmt::Display for LabelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grouped => write!(f, "grouped"),
            Self::Original => write!(f, "original"),
        }
    }
}

/// Composite id of consumption group `consumption` and peak-time group `peaktime`.
pub fn composite_label(k_peaktime: usize, consumption: usize, peaktime: usize) -> usize {
    k_peaktime * consumption + peaktime
}

/// Final cluster assignment of one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Row position in the input batch.
    pub index: usize,
    /// Stage-1 (consumption) group.
    pub consumption: usize,
    /// Stage-2 (peak-time) group within the consumption group.
    pub peaktime: usize,
    /// `k_peaktime * consumption + peaktime`.
    pub label: usize,
}

/// Full result of two-stage clustering.
///
/// Entries are stored in grouped order; [`TwoStageAssignment::aligned_labels`]
/// restores batch order from the carried row indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoStageAssignment {
    /// Number of consumption groups requested.
    pub k_consumption: usize,
    /// Number of peak-time groups requested per consumption group.
    pub k_peaktime: usize,
    entries: Vec<Assignment>,
}

impl TwoStageAssignment {
    /// Merges per-group stage-2 results, visiting groups in the order given.
    pub fn compose(groups: &[PeakTimeGroup], k_consumption: usize, k_peaktime: usize) -> Self {
        let entries = groups
            .iter()
            .flat_map(|g| {
                g.indices
                    .iter()
                    .zip(&g.labels)
                    .map(move |(&index, &peaktime)| Assignment {
                        index,
                        consumption: g.group,
                        peaktime,
                        label: composite_label(k_peaktime, g.group, peaktime),
                    })
            })
            .collect();

        Self {
            k_consumption,
            k_peaktime,
            entries,
        }
    }

    /// Assignments in grouped order.
    pub fn entries(&self) -> &[Assignment] {
        &self.entries
    }

    /// Number of labelled loads.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was labelled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Composite labels in grouped order.
    pub fn labels(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.label).collect()
    }

    /// Assignments sorted back into input batch order.
    pub fn aligned(&self) -> Vec<Assignment> {
        let mut aligned = self.entries.clone();
        aligned.sort_by_key(|e| e.index);
        aligned
    }

    /// Composite labels in input batch order.
    pub fn aligned_labels(&self) -> Vec<usize> {
        self.aligned().iter().map(|e| e.label).collect()
    }

    /// Assignments in the requested order.
    pub fn ordered(&self, order: LabelOrder) -> Vec<Assignment> {
        match order {
            LabelOrder::Grouped => self.entries.clone(),
            LabelOrder::Original => self.aligned(),
        }
    }

    /// Upper bound on composite labels, `k_consumption * k_peaktime`.
    pub fn label_space(&self) -> usize {
        self.k_consumption * self.k_peaktime
    }

    /// Number of distinct composite labels actually emitted.
    pub fn clusters_used(&self) -> usize {
        let mut labels = self.labels();
        labels.sort_unstable();
        labels.dedup();
        labels.len()
    }
}
