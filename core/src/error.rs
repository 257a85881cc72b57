//! Error types for the keyword index

use crate::DocId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No snapshot has been saved at this location yet
    #[error("index not built at {}: run `build` first", root.display())]
    NotBuilt { root: PathBuf },

    /// A single-term operation received text that normalizes to several tokens
    #[error("term {term:?} normalizes to {count} tokens, expected exactly one")]
    MultiTokenQuery { term: String, count: usize },

    /// BM25 tuning outside k1 >= 0, 0 <= b <= 1, or not finite
    #[error("invalid BM25 parameters k1={k1}, b={b}: k1 must be finite and >= 0, b must lie in [0, 1]")]
    InvalidBm25Params { k1: f64, b: f64 },

    #[error("duplicate document id {0} in corpus")]
    DuplicateDocument(DocId),

    #[error("snapshot format version {found} is not supported (expected {expected})")]
    IncompatibleSnapshot { found: u32, expected: u32 },

    /// Loaded tables violate the index invariants
    #[error("inconsistent index: {0}")]
    Inconsistent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
