use crate::error::{Error, Result};
use crate::index::{count_u32, DocId, Document, IndexArtifacts};
use crate::tokenizer::Normalize;

/// Builds all four index tables in one pass over a corpus.
pub struct IndexBuilder<'n, N: Normalize + ?Sized> {
    normalizer: &'n N,
}

impl<'n, N: Normalize + ?Sized> IndexBuilder<'n, N> {
    pub fn new(normalizer: &'n N) -> Self {
        Self { normalizer }
    }

    /// Index every document of `corpus`. Fails on a repeated document id.
    pub fn build<I>(&self, corpus: I) -> Result<IndexArtifacts>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut artifacts = IndexArtifacts::new();
        for doc in corpus {
            if artifacts.docmap.contains_key(&doc.id) {
                return Err(Error::DuplicateDocument(doc.id));
            }
            let tokens = self.normalizer.normalize(&doc.text());
            ingest_doc(&mut artifacts, doc.id, tokens)?;
            artifacts.docmap.insert(doc.id, doc);
        }

        // Sort by doc_id once; each document posted at most once per token.
        for plist in artifacts.postings.values_mut() {
            plist.sort_unstable();
        }

        tracing::info!(num_docs = artifacts.num_docs(), num_terms = artifacts.num_terms(), "built index");
        Ok(artifacts)
    }
}

fn ingest_doc(artifacts: &mut IndexArtifacts, doc_id: DocId, tokens: Vec<String>) -> Result<()> {
    artifacts.doc_lengths.insert(doc_id, count_u32(tokens.len(), "document length")?);

    let counts = artifacts.term_frequencies.entry(doc_id).or_default();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    for token in counts.keys() {
        artifacts.postings.entry(token.clone()).or_default().push(doc_id);
    }
    Ok(())
}
