//! Configuration for fixture sweeps.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::{DEFAULT_CORPUS_SIZE, DEFAULT_NUM_QUERIES, DatasetParams};
use crate::error::{GroundTruthError, Result};
use crate::fixture::fixture_file_name;
use crate::vector::Metric;
use crate::vector::search::DEFAULT_K;

/// Where fixtures land when no directory is given.
pub const DEFAULT_OUTPUT_DIR: &str = "testing/src/test/resources";

/// Dimensions swept by default.
pub const DEFAULT_DIMS: [usize; 3] = [10, 128, 512];

/// Configuration for a sweep over dimensions × metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Directory receiving the fixture files.
    pub output_dir: PathBuf,

    /// Dimensions, outer loop of the grid.
    pub dims: Vec<usize>,

    /// Metric names, inner loop of the grid.
    pub metrics: Vec<String>,

    pub corpus_size: usize,

    pub num_queries: usize,

    /// Neighbors recorded per query.
    pub k: usize,

    /// Build cells on the rayon thread pool.
    pub parallel: bool,

    /// Pretty-print the JSON fixtures.
    pub pretty: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            dims: DEFAULT_DIMS.to_vec(),
            metrics: Metric::ALL.iter().map(|m| m.name().to_string()).collect(),
            corpus_size: DEFAULT_CORPUS_SIZE,
            num_queries: DEFAULT_NUM_QUERIES,
            k: DEFAULT_K,
            parallel: false,
            pretty: false,
        }
    }
}

/// One resolved cell of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepCell {
    pub params: DatasetParams,
    pub path: PathBuf,
}

impl SweepConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Validate the configuration and resolve the ordered list of cells.
    ///
    /// Nothing is generated or written here; any invalid value fails the
    /// whole sweep up front. A (metric, dimension) pair may appear once after
    /// alias resolution, since two such cells would write the same file.
    pub fn plan(&self) -> Result<Vec<SweepCell>> {
        if self.dims.is_empty() {
            return Err(GroundTruthError::invalid_config("no dimensions given"));
        }
        if self.metrics.is_empty() {
            return Err(GroundTruthError::invalid_config("no metrics given"));
        }

        let metrics = self
            .metrics
            .iter()
            .map(|name| Metric::parse_str(name))
            .collect::<Result<Vec<_>>>()?;

        let mut cells = Vec::with_capacity(self.dims.len() * metrics.len());
        let mut seen = HashSet::with_capacity(cells.capacity());
        for &dimension in &self.dims {
            for &metric in &metrics {
                if !seen.insert((metric, dimension)) {
                    return Err(GroundTruthError::invalid_config(format!(
                        "duplicate cell {}",
                        fixture_file_name(metric, dimension)
                    )));
                }
                let params = DatasetParams {
                    metric,
                    dimension,
                    corpus_size: self.corpus_size,
                    num_queries: self.num_queries,
                    k: self.k,
                };
                params.validate()?;
                cells.push(SweepCell {
                    params,
                    path: self.output_dir.join(fixture_file_name(metric, dimension)),
                });
            }
        }
        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let config = SweepConfig::default();
        let cells = config.plan().unwrap();
        assert_eq!(cells.len(), 15);

        // Dimension is the outer loop.
        assert_eq!(cells[0].params.dimension, 10);
        assert_eq!(cells[0].params.metric, Metric::L1);
        assert_eq!(cells[4].params.metric, Metric::Jaccard);
        assert_eq!(cells[5].params.dimension, 128);
        assert_eq!(
            cells[14].path,
            PathBuf::from(DEFAULT_OUTPUT_DIR).join("similarity_jaccard-512.json")
        );
        assert!(cells.iter().all(|c| c.params.k == 10 && c.params.corpus_size == 100));
    }

    #[test]
    fn test_plan_rejects_unknown_metric() {
        let config = SweepConfig {
            metrics: vec!["l2".into(), "chebyshev".into()],
            ..SweepConfig::default()
        };
        assert!(matches!(
            config.plan(),
            Err(GroundTruthError::UnsupportedMetric(name)) if name == "chebyshev"
        ));
    }

    #[test]
    fn test_plan_rejects_small_corpus_and_empty_grid() {
        let config = SweepConfig {
            corpus_size: 9,
            ..SweepConfig::default()
        };
        assert!(matches!(
            config.plan(),
            Err(GroundTruthError::InsufficientCorpus { corpus_size: 9, k: 10 })
        ));

        let config = SweepConfig {
            dims: Vec::new(),
            ..SweepConfig::default()
        };
        assert!(config.plan().is_err());

        let config = SweepConfig {
            dims: vec![0],
            ..SweepConfig::default()
        };
        assert!(config.plan().is_err());
    }

    #[test]
    fn test_plan_rejects_duplicate_cells() {
        let config = SweepConfig {
            dims: vec![4, 4],
            metrics: vec!["l1".into()],
            ..SweepConfig::default()
        };
        assert!(matches!(
            config.plan(),
            Err(GroundTruthError::InvalidArgument(msg)) if msg.contains("similarity_l1-4.json")
        ));

        // An alias resolves to the same cell as its metric.
        let config = SweepConfig {
            dims: vec![4],
            metrics: vec!["angular".into(), "cosine".into()],
            ..SweepConfig::default()
        };
        assert!(matches!(
            config.plan(),
            Err(GroundTruthError::InvalidArgument(msg)) if msg.contains("similarity_angular-4.json")
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SweepConfig =
            serde_json::from_str(r#"{"dims": [4], "metrics": ["cosine"], "pretty": true}"#).unwrap();
        assert_eq!(config.dims, vec![4]);
        assert_eq!(config.corpus_size, 100);
        assert!(config.pretty);

        let cells = config.plan().unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].params.metric, Metric::Angular);
        assert!(cells[0].path.ends_with("similarity_angular-4.json"));
    }
}
