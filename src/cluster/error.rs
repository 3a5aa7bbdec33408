//! Error types for load-profile clustering.

use thiserror::Error;

/// Errors raised while building features or assigning clusters.
///
/// Every pipeline operation fails fast with one of these; no partial label
/// arrays are ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// Wrong shape, ragged rows, invalid readings or non-positive `k`.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of what is wrong with the input.
        message: String,
    },

    /// A load profile whose total energy is zero cannot be normalized.
    #[error("degenerate row {row}: total energy is zero, profile cannot be normalized")]
    DegenerateRow {
        /// Index of the offending row in the load batch.
        row: usize,
    },

    /// The partition primitive was asked for more groups than it has points.
    #[error(
        "insufficient data for requested cluster count{}: k={required}, {actual} groupable points",
        group_suffix(.group)
    )]
    InsufficientData {
        /// Stage-1 group the request was made for, if any.
        group: Option<usize>,
        /// Requested number of clusters.
        required: usize,
        /// Number of groupable (distinct) points available.
        actual: usize,
    },
}

impl ClusterError {
    /// Create an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an `InsufficientData` error with no group context.
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            group: None,
            required,
            actual,
        }
    }

    /// Attaches the stage-1 group index to an error raised while
    /// sub-clustering that group.
    ///
    /// `InsufficientData` records the group; `InvalidInput` gets the group
    /// prefixed to its message. `DegenerateRow` already names its row.
    pub fn in_group(self, group: usize) -> Self {
        match self {
            Self::InsufficientData {
                required, actual, ..
            } => Self::InsufficientData {
                group: Some(group),
                required,
                actual,
            },
            Self::InvalidInput { message } => Self::InvalidInput {
                message: format!("consumption group {group}: {message}"),
            },
            other => other,
        }
    }
}

fn group_suffix(group: &Option<usize>) -> String {
    match group {
        Some(g) => format!(" in consumption group {g}"),
        None => String::new(),
    }
}

/// Convenience alias used throughout the clustering modules.
pub type Result<T> = std::result::Result<T, ClusterError>;
