//! # groundtruth
//!
//! Deterministic ground-truth fixtures for approximate nearest neighbor search.
//!
//! For every (dimension, metric) cell of a sweep, this crate draws a random
//! corpus and query set seeded by the dimension, finds the exact k nearest
//! corpus vectors of every query by brute force, converts their distances to
//! metric-specific similarity scores, and writes the result as a JSON fixture
//! that a downstream test suite uses to measure recall of an approximate engine.
//!
//! ## Features
//!
//! - Dense (`l1`, `l2`, `angular`) and sparse boolean (`hamming`, `jaccard`) metrics
//! - Reproducible corpora: same dimension, same draw
//! - Exact, totally ordered neighbor lists (distance, then corpus index)
//! - Atomic fixture writes and validated fixture reads
//!
//! ```no_run
//! use groundtruth::sweep::{SweepConfig, run_sweep};
//!
//! let config = SweepConfig {
//!     output_dir: "fixtures".into(),
//!     ..SweepConfig::default()
//! };
//! let report = run_sweep(&config)?;
//! assert_eq!(report.cells.len(), 15);
//! # Ok::<(), groundtruth::error::GroundTruthError>(())
//! ```

pub mod cli;
pub mod dataset;
pub mod error;
pub mod fixture;
pub mod sweep;
pub mod vector;

pub mod prelude {
    pub use crate::dataset::{Corpus, DatasetParams, Query, TestDataset};
    pub use crate::error::{GroundTruthError, Result};
    pub use crate::fixture::{read_fixture, write_fixture};
    pub use crate::sweep::{SweepConfig, run_sweep};
    pub use crate::vector::search::ExactKnn;
    pub use crate::vector::{Metric, Vector, VectorKind};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
