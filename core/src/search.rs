use crate::error::{Error, Result};
use crate::index::{DocId, Document, IndexArtifacts};
use crate::persist::{load_snapshot, IndexPaths};
use crate::scoring::{average_length, Bm25Params, Scorer};
use crate::tokenizer::{Normalize, Tokenizer};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// A query session over one loaded snapshot.
///
/// The tables are read once when the engine is created and never change afterwards;
/// a rebuild is picked up by opening a new engine.
#[derive(Debug)]
pub struct QueryEngine<N = Tokenizer> {
    index: IndexArtifacts,
    normalizer: N,
    avg_len: f64,
}

impl QueryEngine<Tokenizer> {
    pub fn open(paths: &IndexPaths) -> Result<Self> {
        Self::open_with(paths, Tokenizer::default())
    }
}

impl<N: Normalize> QueryEngine<N> {
    /// Load the snapshot at `paths`. Fails with `Error::NotBuilt` if none was saved.
    pub fn open_with(paths: &IndexPaths, normalizer: N) -> Result<Self> {
        let index = load_snapshot(paths)?;
        Ok(Self::new(index, normalizer))
    }

    pub fn new(index: IndexArtifacts, normalizer: N) -> Self {
        let avg_len = average_length(&index.doc_lengths);
        Self { index, normalizer, avg_len }
    }

    pub fn index(&self) -> &IndexArtifacts { &self.index }

    pub fn normalizer(&self) -> &N { &self.normalizer }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.index.document(doc_id)
    }

    pub fn scorer(&self) -> Scorer<'_> {
        Scorer::with_avg_len(&self.index, self.avg_len)
    }

    /// Ids of documents containing any token of `query`, ascending by id, at most `limit`.
    pub fn search(&self, query: &str, limit: usize) -> Vec<DocId> {
        let tokens = self.normalizer.normalize(query);
        self.candidates(&tokens).into_iter().take(limit).collect()
    }

    /// Documents containing at least one query token, ranked by BM25 score.
    ///
    /// Query tokens are not deduplicated, so a repeated word counts once per occurrence.
    /// Equal scores are ordered by ascending document id.
    pub fn bm25_search(&self, query: &str, limit: usize, params: Bm25Params) -> Vec<ScoredDoc> {
        let tokens = self.normalizer.normalize(query);
        if tokens.is_empty() || limit == 0 {
            return Vec::new();
        }

        let scorer = self.scorer();
        let idf = scorer.idf_bm25_table(&tokens);

        let candidates = self.candidates(&tokens);
        tracing::debug!(?tokens, candidates = candidates.len(), "bm25 search");

        let mut scored: Vec<ScoredDoc> = candidates
            .into_iter()
            .map(|doc_id| ScoredDoc {
                doc_id,
                score: scorer.bm25_document_score_with_idf(doc_id, &tokens, &idf, params),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
        scored.truncate(limit);
        scored
    }

    pub fn get_tf(&self, doc_id: DocId, term: &str) -> Result<u32> {
        Ok(self
            .single_token(term)?
            .map_or(0, |token| self.scorer().term_frequency(doc_id, &token)))
    }

    pub fn get_idf(&self, term: &str) -> Result<f64> {
        Ok(self.single_token(term)?.map_or(0.0, |token| self.scorer().idf_classic(&token)))
    }

    pub fn get_tfidf(&self, doc_id: DocId, term: &str) -> Result<f64> {
        Ok(self.single_token(term)?.map_or(0.0, |token| self.scorer().tf_idf(doc_id, &token)))
    }

    pub fn get_bm25_tf(&self, doc_id: DocId, term: &str, params: Bm25Params) -> Result<f64> {
        Ok(self
            .single_token(term)?
            .map_or(0.0, |token| self.scorer().bm25_term_score(doc_id, &token, params)))
    }

    pub fn get_bm25_idf(&self, term: &str) -> Result<f64> {
        Ok(self.single_token(term)?.map_or(0.0, |token| self.scorer().idf_bm25(&token)))
    }

    /// Union of the postings of the distinct query tokens.
    fn candidates(&self, tokens: &[String]) -> BTreeSet<DocId> {
        let distinct: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
        distinct
            .into_iter()
            .flat_map(|token| self.index.postings(token).iter().copied())
            .collect()
    }

    /// `None` when `term` is all stopwords or punctuation.
    fn single_token(&self, term: &str) -> Result<Option<String>> {
        let mut tokens = self.normalizer.normalize(term);
        match tokens.len() {
            0 => Ok(None),
            1 => Ok(tokens.pop()),
            count => Err(Error::MultiTokenQuery { term: term.to_string(), count }),
        }
    }
}
