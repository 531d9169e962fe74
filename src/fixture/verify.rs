//! Re-checking fixtures against a fresh exact search.
//!
//! Consumers load a fixture and compare an approximate engine's top-k with
//! the stored indices using [`recall_at_k`]. [`verify_dataset`] applies the
//! same measure to the fixture itself: it recomputes exact neighbors for
//! every stored query and reports how well the stored ground truth agrees.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::TestDataset;
use crate::error::Result;
use crate::vector::Metric;
use crate::vector::search::ExactKnn;

/// Fraction of `ground_truth` found in `candidates`.
///
/// Returns 1.0 for an empty ground truth.
pub fn recall_at_k(ground_truth: &[usize], candidates: &[usize]) -> f64 {
    if ground_truth.is_empty() {
        return 1.0;
    }
    let candidates: HashSet<usize> = candidates.iter().copied().collect();
    let hits = ground_truth
        .iter()
        .filter(|index| candidates.contains(*index))
        .count();
    hits as f64 / ground_truth.len() as f64
}

/// Disagreement between one stored query and the recomputed neighbors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMismatch {
    pub query: usize,
    pub stored_indices: Vec<usize>,
    pub expected_indices: Vec<usize>,
    pub recall: f64,
}

/// Outcome of verifying one fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub metric: Metric,
    pub dimension: usize,
    pub corpus_size: usize,
    pub queries_checked: usize,
    pub k: usize,
    /// Mean recall of the stored indices against the recomputation.
    pub mean_recall: f64,
    /// Largest absolute difference between stored and recomputed similarities.
    pub max_similarity_error: f64,
    /// Whether every stored similarity list is non-increasing.
    pub similarities_ordered: bool,
    pub mismatches: Vec<QueryMismatch>,
}

impl VerificationReport {
    /// True when the stored ground truth matches the recomputation exactly.
    pub fn is_exact(&self) -> bool {
        self.mismatches.is_empty() && self.max_similarity_error == 0.0 && self.similarities_ordered
    }
}

/// Recompute the exact neighbors of every query in `dataset` under `metric`
/// and compare them with the stored ones.
pub fn verify_dataset(dataset: &TestDataset, metric: Metric) -> Result<VerificationReport> {
    let corpus = dataset.corpus();
    let k = dataset.k().unwrap_or(0);

    let mut recall_sum = 0.0;
    let mut max_similarity_error: f64 = 0.0;
    let mut similarities_ordered = true;
    let mut mismatches = Vec::new();

    if k > 0 {
        let knn = ExactKnn::new(corpus, metric)?;
        for (i, query) in dataset.queries().iter().enumerate() {
            let expected = knn.search(&query.vector, k)?;
            let expected_similarities = expected.similarities(metric);

            let recall = recall_at_k(&expected.indices, &query.indices);
            recall_sum += recall;

            for (stored, fresh) in query.similarities.iter().zip(&expected_similarities) {
                max_similarity_error = max_similarity_error.max((stored - fresh).abs());
            }
            if query.similarities.windows(2).any(|w| w[0] < w[1]) {
                similarities_ordered = false;
            }
            if query.indices != expected.indices {
                mismatches.push(QueryMismatch {
                    query: i,
                    stored_indices: query.indices.clone(),
                    expected_indices: expected.indices,
                    recall,
                });
            }
        }
    }

    let queries_checked = if k > 0 { dataset.queries().len() } else { 0 };
    let mean_recall = if queries_checked == 0 {
        1.0
    } else {
        recall_sum / queries_checked as f64
    };

    Ok(VerificationReport {
        metric,
        dimension: corpus.dimension(),
        corpus_size: corpus.len(),
        queries_checked,
        k,
        mean_recall,
        max_similarity_error,
        similarities_ordered,
        mismatches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Corpus, DatasetParams, Query};
    use crate::vector::Vector;

    #[test]
    fn test_recall_at_k() {
        assert_eq!(recall_at_k(&[1, 2, 3, 4], &[4, 3, 2, 1]), 1.0);
        assert_eq!(recall_at_k(&[1, 2, 3, 4], &[1, 2, 9, 8]), 0.5);
        assert_eq!(recall_at_k(&[1, 2], &[]), 0.0);
        assert_eq!(recall_at_k(&[], &[5]), 1.0);
    }

    #[test]
    fn test_generated_dataset_verifies_exactly() {
        for metric in Metric::ALL {
            let mut params = DatasetParams::new(metric, 9);
            params.corpus_size = 40;
            params.num_queries = 5;
            let dataset = TestDataset::build(&params).unwrap();

            let report = verify_dataset(&dataset, metric).unwrap();
            assert!(report.is_exact(), "{metric}: {report:?}");
            assert_eq!(report.queries_checked, 5);
            assert_eq!(report.mean_recall, 1.0);
        }
    }

    #[test]
    fn test_detects_wrong_neighbors() {
        let corpus = Corpus::from_vectors(vec![
            Vector::dense([0.0, 0.0]),
            Vector::dense([1.0, 1.0]),
            Vector::dense([5.0, 5.0]),
        ])
        .unwrap();
        // Stored answer claims the far point is nearest.
        let query = Query::new(Vector::dense([0.0, 0.0]), vec![0.2, 1.0e6], vec![2, 0]);
        let dataset = TestDataset::new(corpus, vec![query]).unwrap();

        let report = verify_dataset(&dataset, Metric::L2).unwrap();
        assert!(!report.is_exact());
        assert!(!report.similarities_ordered);
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].expected_indices, vec![0, 1]);
        assert_eq!(report.mean_recall, 0.5);
    }
}
