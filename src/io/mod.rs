//! CSV input of load batches and output of cluster assignments.

pub mod export;
pub mod import;
