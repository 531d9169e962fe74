//! Fixture encoding, file naming and atomic writes.
//!
//! A fixture is one JSON document:
//!
//! ```json
//! {
//!   "corpus": [ { "floatVector": { "values": [0.1, 0.9] } } ],
//!   "queries": [
//!     {
//!       "vector": { "floatVector": { "values": [0.2, 0.8] } },
//!       "similarities": [7.07],
//!       "indices": [0]
//!     }
//!   ]
//! }
//! ```
//!
//! The document is fully encoded in memory, written to a temporary file next
//! to the target and renamed into place, so readers never observe a partial
//! fixture.

pub mod verify;

use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::dataset::{Corpus, Query, TestDataset};
use crate::error::{GroundTruthError, Result};
use crate::vector::Metric;

const FILE_PREFIX: &str = "similarity_";
const FILE_EXTENSION: &str = ".json";

#[derive(Serialize)]
struct FixtureRecordRef<'a> {
    corpus: &'a Corpus,
    queries: &'a [Query],
}

#[derive(Deserialize)]
struct FixtureRecord {
    corpus: Corpus,
    queries: Vec<Query>,
}

/// File name for the fixture of one (metric, dimension) cell.
pub fn fixture_file_name(metric: Metric, dimension: usize) -> String {
    format!("{FILE_PREFIX}{}-{dimension}{FILE_EXTENSION}", metric.name())
}

/// Recover the metric and dimension from a fixture file name.
pub fn parse_fixture_file_name(name: &str) -> Result<(Metric, usize)> {
    let stem = name
        .strip_prefix(FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(FILE_EXTENSION))
        .ok_or_else(|| {
            GroundTruthError::invalid_argument(format!("not a fixture file name: {name}"))
        })?;

    let (metric, dimension) = stem.rsplit_once('-').ok_or_else(|| {
        GroundTruthError::invalid_argument(format!("missing dimension in fixture file name: {name}"))
    })?;

    let dimension = dimension.parse::<usize>().map_err(|e| {
        GroundTruthError::invalid_argument(format!("bad dimension in fixture file name {name}: {e}"))
    })?;

    Ok((Metric::parse_str(metric)?, dimension))
}

/// Encode a dataset as a fixture document.
pub fn encode_fixture(dataset: &TestDataset, pretty: bool) -> Result<Vec<u8>> {
    let record = FixtureRecordRef {
        corpus: dataset.corpus(),
        queries: dataset.queries(),
    };
    let bytes = if pretty {
        serde_json::to_vec_pretty(&record)?
    } else {
        serde_json::to_vec(&record)?
    };
    Ok(bytes)
}

/// Decode and validate a fixture document.
pub fn decode_fixture(bytes: &[u8]) -> Result<TestDataset> {
    let record: FixtureRecord = serde_json::from_slice(bytes)?;
    TestDataset::new(record.corpus, record.queries)
}

/// Write a dataset to `path`, replacing any existing file atomically.
///
/// Missing parent directories are created.
pub fn write_fixture(dataset: &TestDataset, path: &Path, pretty: bool) -> Result<()> {
    let bytes = encode_fixture(dataset, pretty)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(&bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| GroundTruthError::Io(e.error))?;

    info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Read a fixture from `path`.
pub fn read_fixture(path: &Path) -> Result<TestDataset> {
    let bytes = fs::read(path)?;
    decode_fixture(&bytes)
}

/// Read a fixture and check that its vectors suit `metric`.
pub fn read_fixture_for(path: &Path, metric: Metric) -> Result<TestDataset> {
    let dataset = read_fixture(path)?;
    if dataset.kind() != metric.vector_kind() {
        return Err(GroundTruthError::kind_mismatch(
            format!("metric {metric}"),
            metric.vector_kind(),
            dataset.kind(),
        ));
    }
    Ok(dataset)
}
