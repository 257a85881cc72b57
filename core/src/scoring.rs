//! TF-IDF and BM25 (Okapi) scoring over a loaded snapshot.
//!
//! Every function is total: a missing document, a zero length or an unseen token
//! yields a zero contribution instead of an error.

use crate::error::{Error, Result};
use crate::index::{DocId, DocumentLengthTable, IndexArtifacts};
use std::collections::HashMap;

/// Term-frequency saturation. Higher values let repeated terms keep adding weight longer.
pub const BM25_K1: f64 = 1.5;
/// Length normalization strength: 0 disables it, 1 applies it fully.
pub const BM25_B: f64 = 0.75;

/// Validated BM25 tuning: `k1` finite and non-negative, `b` within [0, 1].
///
/// Outside those ranges the length-normalized denominator can reach zero or go
/// negative, so scores would stop being finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    k1: f64,
    b: f64,
}

impl Bm25Params {
    pub fn new(k1: f64, b: f64) -> Result<Self> {
        if !k1.is_finite() || k1 < 0.0 || !b.is_finite() || !(0.0..=1.0).contains(&b) {
            return Err(Error::InvalidBm25Params { k1, b });
        }
        Ok(Self { k1, b })
    }

    pub fn k1(&self) -> f64 { self.k1 }

    pub fn b(&self) -> f64 { self.b }
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: BM25_K1, b: BM25_B }
    }
}

/// Scoring functions bound to one snapshot. N and the average document length are
/// computed once at construction.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    index: &'a IndexArtifacts,
    avg_len: f64,
}

impl<'a> Scorer<'a> {
    pub fn new(index: &'a IndexArtifacts) -> Self {
        Self::with_avg_len(index, average_length(&index.doc_lengths))
    }

    pub(crate) fn with_avg_len(index: &'a IndexArtifacts, avg_len: f64) -> Self {
        Self { index, avg_len }
    }

    pub fn num_docs(&self) -> usize {
        self.index.num_docs()
    }

    pub fn term_frequency(&self, doc_id: DocId, token: &str) -> u32 {
        self.index
            .term_frequencies
            .get(&doc_id)
            .and_then(|counts| counts.get(token))
            .copied()
            .unwrap_or(0)
    }

    pub fn document_frequency(&self, token: &str) -> usize {
        self.index.postings(token).len()
    }

    /// Mean normalized length; 0 for an empty corpus.
    pub fn avg_document_length(&self) -> f64 {
        self.avg_len
    }

    /// `ln((N + 1) / (df + 1))`
    pub fn idf_classic(&self, token: &str) -> f64 {
        let n = self.num_docs() as f64;
        let df = self.document_frequency(token) as f64;
        ((n + 1.0) / (df + 1.0)).ln()
    }

    /// `ln((N - df + 0.5) / (df + 0.5) + 1)`, not clamped.
    pub fn idf_bm25(&self, token: &str) -> f64 {
        let n = self.num_docs() as f64;
        let df = self.document_frequency(token) as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// Saturated, length-normalized term frequency of `token` in `doc_id`.
    pub fn bm25_term_score(&self, doc_id: DocId, token: &str, params: Bm25Params) -> f64 {
        let tf = self.term_frequency(doc_id, token);
        let len = self.index.doc_lengths.get(&doc_id).copied().unwrap_or(0);
        saturate(tf, len, self.avg_len, params)
    }

    /// Sum of `idf_bm25 * bm25_term_score` over `query_tokens`, repeats included.
    pub fn bm25_document_score<S: AsRef<str>>(&self, doc_id: DocId, query_tokens: &[S], params: Bm25Params) -> f64 {
        let idf = self.idf_bm25_table(query_tokens);
        self.bm25_document_score_with_idf(doc_id, query_tokens, &idf, params)
    }

    /// BM25 IDF of each distinct token, for reuse across many documents.
    pub fn idf_bm25_table<'q, S: AsRef<str>>(&self, query_tokens: &'q [S]) -> HashMap<&'q str, f64> {
        let mut idf = HashMap::new();
        for token in query_tokens {
            let token = token.as_ref();
            idf.entry(token).or_insert_with(|| self.idf_bm25(token));
        }
        idf
    }

    /// Same as `bm25_document_score` with the IDF values looked up in `idf`.
    /// Tokens missing from `idf` fall back to computing it.
    pub fn bm25_document_score_with_idf<S: AsRef<str>>(
        &self,
        doc_id: DocId,
        query_tokens: &[S],
        idf: &HashMap<&str, f64>,
        params: Bm25Params,
    ) -> f64 {
        let len = self.index.doc_lengths.get(&doc_id).copied().unwrap_or(0);
        query_tokens
            .iter()
            .map(|token| {
                let token = token.as_ref();
                let weight = idf.get(token).copied().unwrap_or_else(|| self.idf_bm25(token));
                weight * saturate(self.term_frequency(doc_id, token), len, self.avg_len, params)
            })
            .sum()
    }

    pub fn tf_idf(&self, doc_id: DocId, token: &str) -> f64 {
        f64::from(self.term_frequency(doc_id, token)) * self.idf_classic(token)
    }
}

pub(crate) fn average_length(lengths: &DocumentLengthTable) -> f64 {
    if lengths.is_empty() {
        return 0.0;
    }
    let total: u64 = lengths.values().map(|&len| u64::from(len)).sum();
    total as f64 / lengths.len() as f64
}

fn saturate(tf: u32, len: u32, avg_len: f64, params: Bm25Params) -> f64 {
    if tf == 0 || len == 0 || avg_len == 0.0 {
        return 0.0;
    }
    let tf = f64::from(tf);
    let length_norm = 1.0 - params.b + params.b * (f64::from(len) / avg_len);
    tf * (params.k1 + 1.0) / (tf + params.k1 * length_norm)
}
