//! Core vector data structure.
//!
//! A [`Vector`] is either a dense `f64` vector or a sparse boolean vector that
//! stores only the positions of its `true` bits. The serde encoding is the
//! fixture wire format:
//!
//! ```json
//! { "floatVector": { "values": [0.25, 0.5] } }
//! { "sparseBoolVector": { "totalIndices": 4, "trueIndices": [0, 3] } }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GroundTruthError, Result};
use crate::vector::core::distance::Metric;

/// The two vector representations a dataset may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VectorKind {
    /// Dense real-valued vectors.
    Dense,
    /// Sparse boolean vectors.
    SparseBool,
}

impl VectorKind {
    /// Get the name of this vector kind.
    pub fn name(&self) -> &'static str {
        match self {
            VectorKind::Dense => "dense",
            VectorKind::SparseBool => "sparse-bool",
        }
    }
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dense vector of `f64` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseVector {
    pub values: Vec<f64>,
}

impl DenseVector {
    /// Create a dense vector from anything that yields numbers convertible to `f64`.
    pub fn new<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<f64>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

/// A boolean vector stored as its length and the ascending positions of its set bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSparseBoolVector")]
pub struct SparseBoolVector {
    total_indices: usize,
    true_indices: Vec<usize>,
}

impl SparseBoolVector {
    /// Create a sparse boolean vector from a sequence of booleans.
    pub fn from_bools<I>(bools: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut total_indices = 0;
        let mut true_indices = Vec::new();
        for (i, bit) in bools.into_iter().enumerate() {
            if bit {
                true_indices.push(i);
            }
            total_indices = i + 1;
        }
        Self {
            total_indices,
            true_indices,
        }
    }

    /// Create a sparse boolean vector from its set-bit positions.
    ///
    /// Positions may arrive in any order and may repeat; they are stored sorted
    /// and de-duplicated. Fails if any position is outside `0..total_indices`.
    pub fn from_indices<I>(total_indices: usize, true_indices: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut true_indices: Vec<usize> = true_indices.into_iter().collect();
        true_indices.sort_unstable();
        true_indices.dedup();

        if let Some(&last) = true_indices.last()
            && last >= total_indices
        {
            return Err(GroundTruthError::invalid_argument(format!(
                "true index {last} out of range for {total_indices} total indices"
            )));
        }

        Ok(Self {
            total_indices,
            true_indices,
        })
    }

    pub fn total_indices(&self) -> usize {
        self.total_indices
    }

    /// Positions of the set bits, ascending.
    pub fn true_indices(&self) -> &[usize] {
        &self.true_indices
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.true_indices.len()
    }

    /// Check whether position `index` is set.
    pub fn contains(&self, index: usize) -> bool {
        self.true_indices.binary_search(&index).is_ok()
    }

    /// Expand back into a full boolean sequence.
    pub fn to_bools(&self) -> Vec<bool> {
        let mut bools = vec![false; self.total_indices];
        for &i in &self.true_indices {
            bools[i] = true;
        }
        bools
    }

    /// Number of positions set in both vectors.
    ///
    /// Both index lists are sorted, so a single merge pass suffices.
    pub fn intersection_count(&self, other: &Self) -> usize {
        let (a, b) = (&self.true_indices, &other.true_indices);
        let (mut i, mut j, mut count) = (0, 0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    count += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        count
    }
}

/// Unvalidated wire form of [`SparseBoolVector`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSparseBoolVector {
    total_indices: usize,
    #[serde(default)]
    true_indices: Vec<usize>,
}

impl TryFrom<RawSparseBoolVector> for SparseBoolVector {
    type Error = GroundTruthError;

    fn try_from(raw: RawSparseBoolVector) -> Result<Self> {
        SparseBoolVector::from_indices(raw.total_indices, raw.true_indices)
    }
}

/// A dataset vector: dense or sparse boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Vector {
    #[serde(rename = "floatVector")]
    Dense(DenseVector),
    #[serde(rename = "sparseBoolVector")]
    SparseBool(SparseBoolVector),
}

impl Vector {
    /// Create a dense vector.
    pub fn dense<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<f64>,
    {
        Vector::Dense(DenseVector::new(values))
    }

    /// Create a sparse boolean vector from a boolean sequence.
    pub fn sparse_bool<I>(bools: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        Vector::SparseBool(SparseBoolVector::from_bools(bools))
    }

    pub fn kind(&self) -> VectorKind {
        match self {
            Vector::Dense(_) => VectorKind::Dense,
            Vector::SparseBool(_) => VectorKind::SparseBool,
        }
    }

    /// Dimension of a dense vector, or `total_indices` of a sparse boolean one.
    pub fn dimension(&self) -> usize {
        match self {
            Vector::Dense(v) => v.dimension(),
            Vector::SparseBool(v) => v.total_indices(),
        }
    }

    pub fn as_dense(&self) -> Option<&DenseVector> {
        match self {
            Vector::Dense(v) => Some(v),
            Vector::SparseBool(_) => None,
        }
    }

    pub fn as_sparse_bool(&self) -> Option<&SparseBoolVector> {
        match self {
            Vector::SparseBool(v) => Some(v),
            Vector::Dense(_) => None,
        }
    }

    /// Validate that this vector has the expected dimension.
    pub fn validate_dimension(&self, expected_dim: usize) -> Result<()> {
        let actual = self.dimension();
        if actual != expected_dim {
            return Err(GroundTruthError::dimension_mismatch(expected_dim, actual));
        }
        Ok(())
    }

    /// Validate that this vector has the expected kind and dimension.
    pub fn validate_shape(&self, metric: Metric, kind: VectorKind, dim: usize) -> Result<()> {
        if self.kind() != kind {
            return Err(GroundTruthError::kind_mismatch(
                format!("metric {metric}"),
                kind,
                self.kind(),
            ));
        }
        self.validate_dimension(dim)
    }
}

impl From<DenseVector> for Vector {
    fn from(v: DenseVector) -> Self {
        Vector::Dense(v)
    }
}

impl From<SparseBoolVector> for Vector {
    fn from(v: SparseBoolVector) -> Self {
        Vector::SparseBool(v)
    }
}
