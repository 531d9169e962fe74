//! Deterministic random corpus and query generation.
//!
//! The random stream is a ChaCha8 stream seeded by the dimension alone, so
//! every metric that shares a dimension draws the same numbers and
//! regenerated fixtures are identical run to run and across releases.
//! Coordinates are uniform in `[0, 1)`; boolean metrics threshold the same
//! draws at 0.5, giving independent fair coin flips. Vectors are not
//! normalized.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::dataset::Corpus;
use crate::error::{GroundTruthError, Result};
use crate::vector::{Metric, Vector, VectorKind};

/// Raw generator output: a corpus plus query vectors without neighbors.
#[derive(Debug, Clone)]
pub struct GeneratedData {
    pub corpus: Corpus,
    pub queries: Vec<Vector>,
}

/// Seeded generator for one dimension.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    dimension: usize,
    corpus_size: usize,
    num_queries: usize,
}

impl RandomGenerator {
    pub fn new(dimension: usize, corpus_size: usize, num_queries: usize) -> Self {
        Self {
            dimension,
            corpus_size,
            num_queries,
        }
    }

    /// Seed of the random stream: the dimension.
    pub fn seed(&self) -> u64 {
        self.dimension as u64
    }

    /// Generate a corpus and queries of the vector kind `metric` requires.
    pub fn generate(&self, metric: Metric) -> Result<GeneratedData> {
        self.generate_kind(metric.vector_kind())
    }

    /// Generate a corpus and queries of the given kind.
    ///
    /// The corpus is drawn first, then the queries, from one stream.
    pub fn generate_kind(&self, kind: VectorKind) -> Result<GeneratedData> {
        if self.dimension == 0 {
            return Err(GroundTruthError::invalid_argument("dimension must be positive"));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed());
        let corpus = self.draw(&mut rng, self.corpus_size, kind);
        let queries = self.draw(&mut rng, self.num_queries, kind);

        Ok(GeneratedData {
            corpus: Corpus::new(corpus, self.dimension, kind)?,
            queries,
        })
    }

    fn draw(&self, rng: &mut ChaCha8Rng, count: usize, kind: VectorKind) -> Vec<Vector> {
        (0..count)
            .map(|_| {
                let row = (0..self.dimension).map(|_| rng.random::<f64>());
                match kind {
                    VectorKind::Dense => Vector::dense(row),
                    VectorKind::SparseBool => Vector::sparse_bool(row.map(|x| x >= 0.5)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        let data = RandomGenerator::new(12, 20, 3).generate(Metric::L1).unwrap();
        assert_eq!(data.corpus.len(), 20);
        assert_eq!(data.queries.len(), 3);
        assert_eq!(data.corpus.dimension(), 12);
        assert!(data.queries.iter().all(|q| q.dimension() == 12));

        let values = &data.corpus.get(0).unwrap().as_dense().unwrap().values;
        assert!(values.iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn test_same_dimension_same_draw() {
        let generator = RandomGenerator::new(10, 50, 5);
        let first = generator.generate(Metric::L2).unwrap();
        let second = generator.generate(Metric::L2).unwrap();
        assert_eq!(first.corpus, second.corpus);
        assert_eq!(first.queries, second.queries);

        // The metric does not influence the draw.
        let angular = generator.generate(Metric::Angular).unwrap();
        assert_eq!(first.corpus, angular.corpus);
        let hamming = generator.generate(Metric::Hamming).unwrap();
        let jaccard = generator.generate(Metric::Jaccard).unwrap();
        assert_eq!(hamming.corpus, jaccard.corpus);
        assert_eq!(hamming.queries, jaccard.queries);
    }

    #[test]
    fn test_boolean_draw_thresholds_real_draw() {
        let generator = RandomGenerator::new(32, 8, 2);
        let dense = generator.generate_kind(VectorKind::Dense).unwrap();
        let sparse = generator.generate_kind(VectorKind::SparseBool).unwrap();

        for (d, s) in dense.corpus.iter().zip(sparse.corpus.iter()) {
            let expected: Vec<bool> = d.as_dense().unwrap().values.iter().map(|x| *x >= 0.5).collect();
            assert_eq!(s.as_sparse_bool().unwrap().to_bools(), expected);
        }
    }

    #[test]
    fn test_seed_10_stream_is_pinned() {
        let data = RandomGenerator::new(10, 1, 1).generate(Metric::L2).unwrap();
        let values = &data.corpus.get(0).unwrap().as_dense().unwrap().values;
        assert_eq!(values[0], 0.5598705330254476);
        assert_eq!(values[1], 0.00843103817140567);
        assert_eq!(values[2], 0.5389357552094912);
        assert_eq!(values[3], 0.8622109479175579);

        let bits = RandomGenerator::new(10, 1, 1).generate(Metric::Hamming).unwrap();
        let first = bits.corpus.get(0).unwrap().as_sparse_bool().unwrap();
        assert_eq!(first.to_bools()[..4], [true, false, true, true]);
    }

    #[test]
    fn test_different_dimensions_differ() {
        let a = RandomGenerator::new(10, 5, 1).generate(Metric::L2).unwrap();
        let b = RandomGenerator::new(11, 5, 1).generate(Metric::L2).unwrap();
        let a0 = &a.corpus.get(0).unwrap().as_dense().unwrap().values;
        let b0 = &b.corpus.get(0).unwrap().as_dense().unwrap().values;
        assert_ne!(a0[..10], b0[..10]);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(RandomGenerator::new(0, 5, 1).generate(Metric::L2).is_err());
    }
}
