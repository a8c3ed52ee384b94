//! CLI command implementations.

pub mod common;
pub mod graph;
pub mod qaoa;
pub mod vqe;
pub mod walk;
