mod common;

use common::{build, library, movies, Whitespace};
use kwsearch_core::{Document, IndexBuilder, Normalize, Tokenizer};

#[test]
fn postings_are_backed_by_frequencies() {
    let idx = build(library());
    for (token, ids) in &idx.postings {
        for doc_id in ids {
            assert!(idx.term_frequencies[doc_id][token] >= 1, "{token} in {doc_id}");
        }
    }
}

#[test]
fn lengths_match_frequency_sums() {
    let idx = build(library());
    for (doc_id, len) in &idx.doc_lengths {
        let total: u32 = idx.term_frequencies[doc_id].values().sum();
        assert_eq!(total, *len, "doc {doc_id}");
    }
}

#[test]
fn postings_are_sorted_and_unique() {
    // Ids arrive out of order on purpose.
    let idx = build(library());
    for ids in idx.postings.values() {
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "{ids:?}");
    }
    let forest = Tokenizer::default().normalize("forest").pop().unwrap();
    assert_eq!(idx.postings(&forest), &[4, 10]);
}

#[test]
fn every_document_has_all_entries() {
    let idx = build(library());
    let mut ids: Vec<_> = idx.docmap.keys().copied().collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![3, 4, 5, 7, 10]);
    for id in &ids {
        assert!(idx.doc_lengths.contains_key(id));
        assert!(idx.term_frequencies.contains_key(id));
    }
    assert_eq!(idx.doc_lengths[&5], 0);
    idx.verify().unwrap();
}

#[test]
fn title_and_description_are_both_indexed() {
    let idx = build(movies());
    let t = Tokenizer::default();
    let brave = t.normalize("Brave").pop().unwrap();
    let princess = t.normalize("princess").pop().unwrap();
    assert_eq!(idx.postings(&brave), &[1]);
    assert_eq!(idx.postings(&princess), &[1]);
    assert_eq!(idx.doc_lengths[&1], 4);
    assert_eq!(idx.doc_lengths[&2], 4);
}

#[test]
fn whitespace_normalizer_counts_exactly() {
    let idx = IndexBuilder::new(&Whitespace)
        .build(vec![Document::new(1, "x", "x y x")])
        .unwrap();
    assert_eq!(idx.term_frequencies[&1]["x"], 3);
    assert_eq!(idx.term_frequencies[&1]["y"], 1);
    assert_eq!(idx.doc_lengths[&1], 4);
}

#[test]
fn build_is_deterministic() {
    assert_eq!(build(library()), build(library()));
}

#[test]
fn verify_catches_broken_tables() {
    let mut idx = build(movies());
    idx.doc_lengths.insert(1, 99);
    assert!(matches!(idx.verify(), Err(kwsearch_core::Error::Inconsistent(_))));

    let mut idx = build(movies());
    idx.postings.entry("princess".into()).or_default().push(2);
    assert!(idx.verify().is_err());

    let mut idx = build(movies());
    idx.doc_lengths.remove(&2);
    assert!(idx.verify().is_err());
}
