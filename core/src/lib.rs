pub mod builder;
pub mod error;
pub mod handle;
pub mod index;
pub mod persist;
pub mod scoring;
pub mod search;
pub mod tokenizer;

pub use builder::IndexBuilder;
pub use error::{Error, Result};
pub use handle::IndexHandle;
pub use index::{DocId, Document, DocumentLengthTable, DocumentMap, IndexArtifacts, PostingsIndex, TermFrequencyTable};
pub use persist::IndexPaths;
pub use scoring::{Bm25Params, Scorer, BM25_B, BM25_K1};
pub use search::{QueryEngine, ScoredDoc};
pub use tokenizer::{tokenize, Normalize, Tokenizer};
