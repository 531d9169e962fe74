//! Fixture sweep over a grid of dimensions × metrics.
//!
//! Each cell builds one [`TestDataset`] and writes it to
//! `similarity_<metric>-<dim>.json`. Cells share nothing: the random stream
//! is seeded by the cell's dimension and the output file is the cell's own,
//! so they may run in any order or in parallel. The first failing cell aborts
//! the sweep; fixtures are regenerated wholesale, never patched.

pub mod config;

use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::TestDataset;
use crate::error::Result;
use crate::fixture::write_fixture;
use crate::vector::Metric;

pub use self::config::{SweepCell, SweepConfig};

/// Result of one written cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellReport {
    pub metric: Metric,
    pub dimension: usize,
    pub path: PathBuf,
    pub corpus_size: usize,
    pub num_queries: usize,
    pub k: usize,
}

/// Result of a whole sweep, cells in grid order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub cells: Vec<CellReport>,
    pub elapsed_ms: u64,
}

/// Build and write a single cell.
pub fn run_cell(cell: &SweepCell, pretty: bool) -> Result<CellReport> {
    let params = &cell.params;
    debug!(
        "generating {} dim={} (seed {})",
        params.metric, params.dimension, params.dimension
    );

    let dataset = TestDataset::build(params)?;
    write_fixture(&dataset, &cell.path, pretty)?;

    info!(
        "Saved {}-dimensional {} to {}",
        params.dimension,
        params.metric,
        cell.path.display()
    );

    Ok(CellReport {
        metric: params.metric,
        dimension: params.dimension,
        path: cell.path.clone(),
        corpus_size: dataset.corpus().len(),
        num_queries: dataset.queries().len(),
        k: params.k,
    })
}

/// Run every cell of the configured grid.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepReport> {
    let start = Instant::now();
    let cells = config.plan()?;
    info!(
        "sweeping {} cells into {}",
        cells.len(),
        config.output_dir.display()
    );

    let reports = if config.parallel {
        cells
            .par_iter()
            .map(|cell| run_cell(cell, config.pretty))
            .collect::<Result<Vec<_>>>()?
    } else {
        cells
            .iter()
            .map(|cell| run_cell(cell, config.pretty))
            .collect::<Result<Vec<_>>>()?
    };

    Ok(SweepReport {
        cells: reports,
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetParams;
    use crate::fixture::read_fixture;

    #[test]
    fn test_run_cell_writes_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let mut params = DatasetParams::new(Metric::Jaccard, 6);
        params.corpus_size = 12;
        params.num_queries = 2;
        params.k = 3;
        let cell = SweepCell {
            params,
            path: dir.path().join("similarity_jaccard-6.json"),
        };

        let report = run_cell(&cell, false).unwrap();
        assert_eq!(report.corpus_size, 12);
        assert_eq!(report.num_queries, 2);

        let dataset = read_fixture(&cell.path).unwrap();
        assert_eq!(dataset, TestDataset::build(&params).unwrap());
    }

    #[test]
    fn test_sweep_aborts_before_writing_on_bad_metric() {
        let dir = tempfile::tempdir().unwrap();
        let config = SweepConfig {
            output_dir: dir.path().to_path_buf(),
            dims: vec![4],
            metrics: vec!["l1".into(), "bogus".into()],
            ..SweepConfig::default()
        };
        assert!(run_sweep(&config).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_sweep_aborts_before_writing_on_duplicate_cell() {
        let dir = tempfile::tempdir().unwrap();
        let config = SweepConfig {
            output_dir: dir.path().to_path_buf(),
            dims: vec![4, 4],
            metrics: vec!["angular".into(), "cosine".into()],
            ..SweepConfig::default()
        };
        assert!(run_sweep(&config).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
