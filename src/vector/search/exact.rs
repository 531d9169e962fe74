//! Exact (brute force) k-nearest-neighbor search.
//!
//! Every query is compared against every corpus vector. The result is the
//! ground truth an approximate engine is measured against, so ordering is
//! fully deterministic: ascending distance, ties broken by ascending corpus
//! index.

use std::cmp::Ordering;

use log::debug;

use crate::dataset::Corpus;
use crate::error::{GroundTruthError, Result};
use crate::vector::{Metric, Vector};

/// Number of neighbors recorded per query in generated fixtures.
pub const DEFAULT_K: usize = 10;

/// Nearest neighbors of one query, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbors {
    /// Raw metric distances, aligned with `indices`.
    pub distances: Vec<f64>,
    /// Corpus positions.
    pub indices: Vec<usize>,
}

impl Neighbors {
    /// Similarity scores for these neighbors under `metric`, in the same order.
    pub fn similarities(&self, metric: Metric) -> Vec<f64> {
        self.distances
            .iter()
            .map(|&d| metric.similarity_from_distance(d))
            .collect()
    }
}

fn by_distance_then_index(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Exhaustive k-NN searcher over one corpus.
pub struct ExactKnn<'a> {
    corpus: &'a Corpus,
    metric: Metric,
}

impl<'a> ExactKnn<'a> {
    /// Create a searcher, rejecting a corpus of the wrong vector kind for `metric`.
    pub fn new(corpus: &'a Corpus, metric: Metric) -> Result<Self> {
        if corpus.kind() != metric.vector_kind() {
            return Err(GroundTruthError::kind_mismatch(
                format!("metric {metric}"),
                metric.vector_kind(),
                corpus.kind(),
            ));
        }
        Ok(Self { corpus, metric })
    }

    /// Find the `k` corpus vectors nearest to `query`.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Neighbors> {
        self.check_k(k)?;
        query.validate_shape(self.metric, self.corpus.kind(), self.corpus.dimension())?;

        let mut candidates = self
            .corpus
            .iter()
            .enumerate()
            .map(|(index, vector)| {
                self.metric
                    .distance(query, vector)
                    .map(|distance| (distance, index))
            })
            .collect::<Result<Vec<_>>>()?;

        // Partition around the k-th element, then order only the head.
        if k < candidates.len() {
            candidates.select_nth_unstable_by(k - 1, by_distance_then_index);
            candidates.truncate(k);
        }
        candidates.sort_unstable_by(by_distance_then_index);

        let (distances, indices) = candidates.into_iter().unzip();
        Ok(Neighbors { distances, indices })
    }

    /// Find the `k` nearest corpus vectors for each query, in query order.
    pub fn search_batch(&self, queries: &[Vector], k: usize) -> Result<Vec<Neighbors>> {
        self.check_k(k)?;
        debug!(
            "exact {} search: {} queries x {} corpus vectors, k={}",
            self.metric,
            queries.len(),
            self.corpus.len(),
            k
        );
        queries.iter().map(|query| self.search(query, k)).collect()
    }

    fn check_k(&self, k: usize) -> Result<()> {
        if k == 0 {
            return Err(GroundTruthError::invalid_argument("k must be positive"));
        }
        if self.corpus.len() < k {
            return Err(GroundTruthError::insufficient_corpus(self.corpus.len(), k));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::VectorKind;

    fn dense_corpus(points: &[[f64; 2]]) -> Corpus {
        Corpus::new(
            points.iter().map(|p| Vector::dense(p.iter().copied())).collect(),
            2,
            VectorKind::Dense,
        )
        .unwrap()
    }

    #[test]
    fn test_nearest_first() {
        let corpus = dense_corpus(&[[5.0, 5.0], [1.0, 1.0], [0.0, 0.5], [3.0, 3.0]]);
        let knn = ExactKnn::new(&corpus, Metric::L2).unwrap();

        let neighbors = knn.search(&Vector::dense([0.0, 0.0]), 3).unwrap();
        assert_eq!(neighbors.indices, vec![2, 1, 3]);
        assert!(neighbors.distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(neighbors.distances[0], 0.5);
    }

    #[test]
    fn test_ties_break_by_index() {
        let corpus = dense_corpus(&[[2.0, 0.0], [1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0]]);
        let knn = ExactKnn::new(&corpus, Metric::L1).unwrap();

        let neighbors = knn.search(&Vector::dense([0.0, 0.0]), 3).unwrap();
        assert_eq!(neighbors.indices, vec![1, 2, 3]);
        assert_eq!(neighbors.distances, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_k_equal_to_corpus_size() {
        let corpus = dense_corpus(&[[3.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        let knn = ExactKnn::new(&corpus, Metric::L2).unwrap();
        let neighbors = knn.search(&Vector::dense([0.0, 0.0]), 3).unwrap();
        assert_eq!(neighbors.indices, vec![1, 2, 0]);
    }

    #[test]
    fn test_insufficient_corpus() {
        let corpus = dense_corpus(&[[0.0, 0.0], [1.0, 1.0]]);
        let knn = ExactKnn::new(&corpus, Metric::L2).unwrap();
        assert!(matches!(
            knn.search(&Vector::dense([0.0, 0.0]), DEFAULT_K),
            Err(GroundTruthError::InsufficientCorpus {
                corpus_size: 2,
                k: 10
            })
        ));
        assert!(matches!(
            knn.search_batch(&[], 3),
            Err(GroundTruthError::InsufficientCorpus { .. })
        ));
        assert!(knn.search(&Vector::dense([0.0, 0.0]), 0).is_err());
    }

    #[test]
    fn test_rejects_wrong_kind_and_dimension() {
        let corpus = dense_corpus(&[[0.0, 0.0]]);
        assert!(matches!(
            ExactKnn::new(&corpus, Metric::Jaccard),
            Err(GroundTruthError::VectorKindMismatch { .. })
        ));

        let knn = ExactKnn::new(&corpus, Metric::L2).unwrap();
        assert!(matches!(
            knn.search(&Vector::dense([0.0, 0.0, 0.0]), 1),
            Err(GroundTruthError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_jaccard_exact_match_ranks_first() {
        let vectors = vec![
            Vector::sparse_bool([true, false, true, false]),
            Vector::sparse_bool([true, true, true, true]),
            Vector::sparse_bool([false, true, false, true]),
        ];
        let query = vectors[0].clone();
        let corpus = Corpus::new(vectors, 4, VectorKind::SparseBool).unwrap();
        let knn = ExactKnn::new(&corpus, Metric::Jaccard).unwrap();

        let neighbors = knn.search(&query, 2).unwrap();
        assert_eq!(neighbors.indices[0], 0);
        assert_eq!(neighbors.distances[0], 0.0);
        assert_eq!(neighbors.similarities(Metric::Jaccard)[0], 1.0);
    }
}
