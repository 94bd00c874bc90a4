// src/dag/mod.rs

//! Dependency graphs and ordering.
//!
//! - [`topo`] holds the reusable layered topological sort.
//! - [`layers`] applies it to the registry's compile modules, including
//!   the dependsOn/stage mismatch policy.

pub mod layers;
pub mod topo;

pub use layers::compile_layers;
pub use topo::{layered_sort, CycleError};
