//! Core data structures for ground-truth generation.
//!
//! This module contains the vector representation and the metric registry
//! used throughout the crate.

pub mod distance;
pub mod vector;
