//! Vector model, metric registry and exact nearest neighbor search.
//!
//! # Module Structure
//!
//! - `core`: Core data structures (vector, distance metrics)
//! - `search`: Exhaustive (brute force) k-NN search

pub mod core;
pub mod search;

pub use self::core::distance::Metric;
pub use self::core::vector::{DenseVector, SparseBoolVector, Vector, VectorKind};
