use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Document {
    pub fn new(id: DocId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { id, title: title.into(), description: description.into() }
    }

    /// The text that gets indexed: title and description joined by a space.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// token -> ids of documents containing it, strictly ascending
pub type PostingsIndex = HashMap<String, Vec<DocId>>;
pub type DocumentMap = HashMap<DocId, Document>;
/// doc id -> token -> occurrences (always >= 1)
pub type TermFrequencyTable = HashMap<DocId, HashMap<String, u32>>;
/// doc id -> normalized token count, repeats included
pub type DocumentLengthTable = HashMap<DocId, u32>;

/// Narrow a count to the `u32` the tables store, failing instead of truncating.
pub(crate) fn count_u32(count: usize, what: &str) -> Result<u32> {
    u32::try_from(count).map_err(|_| Error::Inconsistent(format!("{what} {count} does not fit in u32")))
}

/// The four tables produced by one build and persisted as one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexArtifacts {
    pub postings: PostingsIndex,
    pub docmap: DocumentMap,
    pub term_frequencies: TermFrequencyTable,
    pub doc_lengths: DocumentLengthTable,
}

impl IndexArtifacts {
    pub fn new() -> Self { Self::default() }

    pub fn num_docs(&self) -> usize { self.docmap.len() }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    /// Postings list for `token`, empty when the token was never indexed.
    pub fn postings(&self, token: &str) -> &[DocId] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.docmap.get(&doc_id)
    }

    /// Check the cross-table invariants that every successful build establishes.
    pub fn verify(&self) -> Result<()> {
        for (token, ids) in &self.postings {
            if ids.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::Inconsistent(format!("postings for {token:?} are not strictly ascending")));
            }
            for doc_id in ids {
                let tf = self
                    .term_frequencies
                    .get(doc_id)
                    .and_then(|counts| counts.get(token))
                    .copied()
                    .unwrap_or(0);
                if tf == 0 {
                    return Err(Error::Inconsistent(format!("doc {doc_id} is posted under {token:?} but has no frequency for it")));
                }
            }
        }

        if self.doc_lengths.len() != self.docmap.len() || self.term_frequencies.len() != self.docmap.len() {
            return Err(Error::Inconsistent(format!(
                "table sizes differ: {} documents, {} lengths, {} frequency maps",
                self.docmap.len(),
                self.doc_lengths.len(),
                self.term_frequencies.len()
            )));
        }

        for (doc_id, doc) in &self.docmap {
            if doc.id != *doc_id {
                return Err(Error::Inconsistent(format!("document stored under id {doc_id} carries id {}", doc.id)));
            }
            let (Some(len), Some(counts)) = (self.doc_lengths.get(doc_id), self.term_frequencies.get(doc_id)) else {
                return Err(Error::Inconsistent(format!("doc {doc_id} is missing length or frequency entries")));
            };
            let total: u64 = counts.values().map(|&c| u64::from(c)).sum();
            if total != u64::from(*len) {
                return Err(Error::Inconsistent(format!("doc {doc_id} has length {len} but {total} counted tokens")));
            }
        }
        Ok(())
    }
}
