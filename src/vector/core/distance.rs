//! Distance metrics and their distance→similarity transforms.
//!
//! Each [`Metric`] owns one row of [`METRIC_TABLE`]: the vector kind it
//! accepts, the raw distance function, and the transform that turns a raw
//! distance into the similarity score written to fixtures. Similarities are
//! only comparable within one metric.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GroundTruthError, Result};
use crate::vector::core::vector::{SparseBoolVector, Vector, VectorKind};

/// Guards the `1 / d` transform against division by zero.
pub const SIMILARITY_EPSILON: f64 = 1e-6;

/// Supported metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Manhattan distance.
    L1,
    /// Euclidean distance.
    L2,
    /// Cosine distance (1 - cosine similarity).
    #[serde(alias = "cosine")]
    Angular,
    /// Fraction of differing bits.
    Hamming,
    /// 1 - |A ∩ B| / |A ∪ B| over the set bits.
    Jaccard,
}

/// Raw distance function, typed by the vector kind it accepts.
#[derive(Clone, Copy)]
pub enum DistanceFn {
    Dense(fn(&[f64], &[f64]) -> f64),
    SparseBool(fn(&SparseBoolVector, &SparseBoolVector) -> f64),
}

impl DistanceFn {
    pub fn kind(&self) -> VectorKind {
        match self {
            DistanceFn::Dense(_) => VectorKind::Dense,
            DistanceFn::SparseBool(_) => VectorKind::SparseBool,
        }
    }
}

/// One registry row.
pub struct MetricSpec {
    pub metric: Metric,
    /// Name used in fixture file names.
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub distance: DistanceFn,
    pub similarity: fn(f64) -> f64,
    /// Human-readable formulas, shown by the CLI.
    pub distance_formula: &'static str,
    pub similarity_formula: &'static str,
}

/// The metric registry. Adding a metric is one row here plus one enum variant.
pub static METRIC_TABLE: [MetricSpec; 5] = [
    MetricSpec {
        metric: Metric::L1,
        name: "l1",
        aliases: &["manhattan"],
        distance: DistanceFn::Dense(manhattan),
        similarity: inverse_similarity,
        distance_formula: "sum |u_i - v_i|",
        similarity_formula: "1 / (d + 1e-6)",
    },
    MetricSpec {
        metric: Metric::L2,
        name: "l2",
        aliases: &["euclidean"],
        distance: DistanceFn::Dense(euclidean),
        similarity: inverse_similarity,
        distance_formula: "sqrt(sum (u_i - v_i)^2)",
        similarity_formula: "1 / (d + 1e-6)",
    },
    MetricSpec {
        metric: Metric::Angular,
        name: "angular",
        aliases: &["cosine"],
        distance: DistanceFn::Dense(cosine_distance),
        similarity: angular_similarity,
        distance_formula: "1 - (u . v) / (|u| |v|)",
        similarity_formula: "2 - d",
    },
    MetricSpec {
        metric: Metric::Hamming,
        name: "hamming",
        aliases: &[],
        distance: DistanceFn::SparseBool(hamming),
        similarity: complement_similarity,
        distance_formula: "|u xor v| / total_indices",
        similarity_formula: "1 - d",
    },
    MetricSpec {
        metric: Metric::Jaccard,
        name: "jaccard",
        aliases: &[],
        distance: DistanceFn::SparseBool(jaccard),
        similarity: complement_similarity,
        distance_formula: "1 - |u and v| / |u or v|",
        similarity_formula: "1 - d",
    },
];

impl Metric {
    /// All metrics, in registry order.
    pub const ALL: [Metric; 5] = [
        Metric::L1,
        Metric::L2,
        Metric::Angular,
        Metric::Hamming,
        Metric::Jaccard,
    ];

    /// Registry row for this metric.
    pub fn spec(&self) -> &'static MetricSpec {
        &METRIC_TABLE[*self as usize]
    }

    /// Get the name of this metric.
    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// Vector kind this metric operates on.
    pub fn vector_kind(&self) -> VectorKind {
        self.spec().distance.kind()
    }

    /// Whether this metric operates on sparse boolean vectors.
    pub fn is_boolean(&self) -> bool {
        self.vector_kind() == VectorKind::SparseBool
    }

    /// Parse a metric from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        METRIC_TABLE
            .iter()
            .find(|spec| spec.name == needle || spec.aliases.contains(&needle.as_str()))
            .map(|spec| spec.metric)
            .ok_or_else(|| GroundTruthError::unsupported_metric(s))
    }

    /// Calculate the distance between two vectors using this metric.
    ///
    /// Both vectors must be of this metric's kind and share one dimension.
    pub fn distance(&self, a: &Vector, b: &Vector) -> Result<f64> {
        if a.dimension() != b.dimension() {
            return Err(GroundTruthError::dimension_mismatch(
                a.dimension(),
                b.dimension(),
            ));
        }

        match (self.spec().distance, a, b) {
            (DistanceFn::Dense(f), Vector::Dense(a), Vector::Dense(b)) => {
                Ok(f(&a.values, &b.values))
            }
            (DistanceFn::SparseBool(f), Vector::SparseBool(a), Vector::SparseBool(b)) => {
                Ok(f(a, b))
            }
            (distance, a, b) => {
                let actual = if a.kind() != distance.kind() {
                    a.kind()
                } else {
                    b.kind()
                };
                Err(GroundTruthError::kind_mismatch(
                    format!("metric {self}"),
                    distance.kind(),
                    actual,
                ))
            }
        }
    }

    /// Convert a raw distance under this metric into a similarity score.
    pub fn similarity_from_distance(&self, distance: f64) -> f64 {
        (self.spec().similarity)(distance)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = GroundTruthError;

    fn from_str(s: &str) -> Result<Self> {
        Metric::parse_str(s)
    }
}

fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        1.0
    } else {
        // Rounding can push the cosine slightly past 1 for parallel vectors.
        (1.0 - dot_product / (norm_a * norm_b)).max(0.0)
    }
}

fn hamming(a: &SparseBoolVector, b: &SparseBoolVector) -> f64 {
    if a.total_indices() == 0 {
        return 0.0;
    }
    let common = a.intersection_count(b);
    let differing = a.count_ones() + b.count_ones() - 2 * common;
    differing as f64 / a.total_indices() as f64
}

fn jaccard(a: &SparseBoolVector, b: &SparseBoolVector) -> f64 {
    let intersection = a.intersection_count(b);
    let union = a.count_ones() + b.count_ones() - intersection;
    if union == 0 {
        // Two all-false vectors are identical.
        0.0
    } else {
        1.0 - intersection as f64 / union as f64
    }
}

fn inverse_similarity(d: f64) -> f64 {
    1.0 / (d + SIMILARITY_EPSILON)
}

fn angular_similarity(d: f64) -> f64 {
    2.0 - d
}

fn complement_similarity(d: f64) -> f64 {
    1.0 - d
}
