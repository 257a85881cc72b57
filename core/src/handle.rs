use crate::error::Result;
use crate::persist::IndexPaths;
use crate::search::QueryEngine;
use crate::tokenizer::{Normalize, Tokenizer};
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared access point for query sessions against one snapshot directory.
///
/// `reload` swaps in a freshly loaded engine; engines already handed out by `session`
/// keep the tables they were loaded with.
pub struct IndexHandle<N = Tokenizer> {
    paths: IndexPaths,
    current: RwLock<Arc<QueryEngine<N>>>,
}

impl IndexHandle<Tokenizer> {
    pub fn open(paths: IndexPaths) -> Result<Self> {
        Self::open_with(paths, Tokenizer::default())
    }
}

impl<N: Normalize + Clone> IndexHandle<N> {
    pub fn open_with(paths: IndexPaths, normalizer: N) -> Result<Self> {
        let engine = QueryEngine::open_with(&paths, normalizer)?;
        Ok(Self { paths, current: RwLock::new(Arc::new(engine)) })
    }

    pub fn paths(&self) -> &IndexPaths { &self.paths }

    pub fn session(&self) -> Arc<QueryEngine<N>> {
        self.current.read().clone()
    }

    /// Load the snapshot again and make it the current session. On error the previous
    /// session stays current.
    pub fn reload(&self) -> Result<()> {
        let normalizer = self.current.read().normalizer().clone();
        let engine = QueryEngine::open_with(&self.paths, normalizer)?;
        let num_docs = engine.index().num_docs();
        *self.current.write() = Arc::new(engine);
        tracing::info!(root = %self.paths.root.display(), num_docs, "swapped in reloaded snapshot");
        Ok(())
    }
}
