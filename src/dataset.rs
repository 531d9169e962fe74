//! Corpus, queries and the assembled ground-truth dataset.
//!
//! A [`TestDataset`] is built once per (dimension, metric) cell: random
//! vectors from [`generator`], exact neighbors from
//! [`ExactKnn`](crate::vector::search::ExactKnn), and similarity scores from
//! the metric registry. It is validated on construction and never mutated.

pub mod generator;

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GroundTruthError, Result};
use crate::vector::search::{DEFAULT_K, ExactKnn};
use crate::vector::{Metric, Vector, VectorKind};

use self::generator::RandomGenerator;

/// Default number of corpus vectors per dataset.
pub const DEFAULT_CORPUS_SIZE: usize = 100;

/// Default number of queries per dataset.
pub const DEFAULT_NUM_QUERIES: usize = 10;

/// An ordered, immutable set of vectors of one kind and dimension.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Vector>")]
pub struct Corpus {
    vectors: Vec<Vector>,
    dimension: usize,
    kind: VectorKind,
}

impl Corpus {
    /// Create a corpus, checking every vector against `kind` and `dimension`.
    pub fn new(vectors: Vec<Vector>, dimension: usize, kind: VectorKind) -> Result<Self> {
        for vector in &vectors {
            if vector.kind() != kind {
                return Err(GroundTruthError::kind_mismatch("corpus", kind, vector.kind()));
            }
            vector.validate_dimension(dimension)?;
        }
        Ok(Self {
            vectors,
            dimension,
            kind,
        })
    }

    /// Create a corpus whose kind and dimension are taken from its first vector.
    pub fn from_vectors(vectors: Vec<Vector>) -> Result<Self> {
        let first = vectors
            .first()
            .ok_or_else(|| GroundTruthError::invalid_argument("corpus is empty"))?;
        let (dimension, kind) = (first.dimension(), first.kind());
        Self::new(vectors, dimension, kind)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn kind(&self) -> VectorKind {
        self.kind
    }

    pub fn get(&self, index: usize) -> Option<&Vector> {
        self.vectors.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        self.vectors.iter()
    }
}

/// A corpus is written as the bare array of its vectors.
impl Serialize for Corpus {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.vectors.serialize(serializer)
    }
}

impl TryFrom<Vec<Vector>> for Corpus {
    type Error = GroundTruthError;

    fn try_from(vectors: Vec<Vector>) -> Result<Self> {
        Corpus::from_vectors(vectors)
    }
}

/// A query vector and its exact nearest neighbors, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub vector: Vector,
    /// Metric similarities, aligned with `indices`.
    pub similarities: Vec<f64>,
    /// Corpus positions of the neighbors.
    #[serde(deserialize_with = "deserialize_indices")]
    pub indices: Vec<usize>,
}

/// Accept corpus positions written as integers or as integral floats (`12.0`).
fn deserialize_indices<'de, D>(deserializer: D) -> std::result::Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIndex {
        Integer(usize),
        Float(f64),
    }

    Vec::<RawIndex>::deserialize(deserializer)?
        .into_iter()
        .map(|raw| match raw {
            RawIndex::Integer(index) => Ok(index),
            RawIndex::Float(x) if x >= 0.0 && x.fract() == 0.0 && x < usize::MAX as f64 => {
                Ok(x as usize)
            }
            RawIndex::Float(x) => Err(serde::de::Error::custom(format!(
                "corpus index {x} is not a non-negative integer"
            ))),
        })
        .collect()
}

impl Query {
    pub fn new(vector: Vector, similarities: Vec<f64>, indices: Vec<usize>) -> Self {
        Self {
            vector,
            similarities,
            indices,
        }
    }

    /// Number of recorded neighbors.
    pub fn k(&self) -> usize {
        self.indices.len()
    }
}

/// Parameters for one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetParams {
    pub metric: Metric,
    pub dimension: usize,
    pub corpus_size: usize,
    pub num_queries: usize,
    pub k: usize,
}

impl DatasetParams {
    /// Parameters with the default corpus size, query count and k.
    pub fn new(metric: Metric, dimension: usize) -> Self {
        Self {
            metric,
            dimension,
            corpus_size: DEFAULT_CORPUS_SIZE,
            num_queries: DEFAULT_NUM_QUERIES,
            k: DEFAULT_K,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(GroundTruthError::invalid_argument("dimension must be positive"));
        }
        if self.k == 0 {
            return Err(GroundTruthError::invalid_argument("k must be positive"));
        }
        if self.corpus_size < self.k {
            return Err(GroundTruthError::insufficient_corpus(self.corpus_size, self.k));
        }
        Ok(())
    }
}

/// A corpus with its queries and their ground-truth neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct TestDataset {
    corpus: Corpus,
    queries: Vec<Query>,
}

impl TestDataset {
    /// Assemble a dataset, checking that every query matches the corpus shape
    /// and that every neighbor list is aligned, in range and duplicate-free.
    pub fn new(corpus: Corpus, queries: Vec<Query>) -> Result<Self> {
        let k = queries.first().map(Query::k);

        for (i, query) in queries.iter().enumerate() {
            if query.vector.kind() != corpus.kind() {
                return Err(GroundTruthError::kind_mismatch(
                    format!("query {i}"),
                    corpus.kind(),
                    query.vector.kind(),
                ));
            }
            query.vector.validate_dimension(corpus.dimension())?;

            if query.similarities.len() != query.indices.len() {
                return Err(GroundTruthError::invalid_fixture(format!(
                    "query {i} has {} similarities for {} indices",
                    query.similarities.len(),
                    query.indices.len()
                )));
            }
            if Some(query.k()) != k {
                return Err(GroundTruthError::invalid_fixture(format!(
                    "query {i} has {} neighbors, expected {}",
                    query.k(),
                    k.unwrap_or_default()
                )));
            }

            let mut seen = HashSet::with_capacity(query.indices.len());
            for &index in &query.indices {
                if index >= corpus.len() {
                    return Err(GroundTruthError::invalid_fixture(format!(
                        "query {i} references corpus index {index} of {}",
                        corpus.len()
                    )));
                }
                if !seen.insert(index) {
                    return Err(GroundTruthError::invalid_fixture(format!(
                        "query {i} lists corpus index {index} twice"
                    )));
                }
            }
        }

        Ok(Self { corpus, queries })
    }

    /// Generate a dataset: random corpus and queries seeded by the dimension,
    /// exact k-NN under the metric, then distance→similarity conversion.
    pub fn build(params: &DatasetParams) -> Result<Self> {
        params.validate()?;
        let metric = params.metric;

        let generated = RandomGenerator::new(params.dimension, params.corpus_size, params.num_queries)
            .generate(metric)?;

        let knn = ExactKnn::new(&generated.corpus, metric)?;
        let neighbors = knn.search_batch(&generated.queries, params.k)?;

        let queries = generated
            .queries
            .into_iter()
            .zip(neighbors)
            .map(|(vector, neighbors)| {
                let similarities = neighbors.similarities(metric);
                Query::new(vector, similarities, neighbors.indices)
            })
            .collect();

        debug!(
            "built {} dataset: dim={}, corpus={}, queries={}, k={}",
            metric, params.dimension, params.corpus_size, params.num_queries, params.k
        );
        Self::new(generated.corpus, queries)
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// Neighbors per query, or `None` for a dataset without queries.
    pub fn k(&self) -> Option<usize> {
        self.queries.first().map(Query::k)
    }

    pub fn dimension(&self) -> usize {
        self.corpus.dimension()
    }

    pub fn kind(&self) -> VectorKind {
        self.corpus.kind()
    }
}
