//! Two-stage load profile clustering: features, partitioning, and labels.

/// Stage-1 clustering on integrated consumption features.
pub mod consumption;
pub mod error;
pub mod features;
pub mod integrate;
pub mod kmeans;
/// Composite label numbering and ordering.
pub mod labels;
pub mod partition;
/// Stage-2 clustering on normalized shapes.
pub mod peaktime;
pub mod pipeline;
pub mod summary;

pub use consumption::{
    ConsumptionClusters, cluster_by_consumption, cluster_by_consumption_with_shapes,
};
pub use error::ClusterError;
pub use integrate::integrate;
pub use kmeans::KMeans;
pub use labels::{Assignment, LabelOrder, TwoStageAssignment};
pub use partition::Partitioner;
pub use pipeline::{two_stage_assign, two_stage_cluster};
pub use summary::ClusterSummary;
