//! Nearest neighbor search over a corpus.

pub mod exact;

pub use self::exact::{ExactKnn, Neighbors, DEFAULT_K};
