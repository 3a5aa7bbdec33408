//! Two-stage clustering of electricity load profiles by consumption shape
//! and peak timing.

pub mod cli;
/// Feature engineering, partitioning, and composite labels.
pub mod cluster;
pub mod config;
pub mod io;
pub mod profile;
