//! Load profile containers and synthetic profile generation.

pub mod batch;
pub mod synthetic;

pub use batch::LoadBatch;
