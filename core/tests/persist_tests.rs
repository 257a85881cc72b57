mod common;

use common::{build, library, movies};
use kwsearch_core::persist::{
    load_doc_lengths, load_docmap, load_meta, load_postings, load_snapshot, load_table, load_term_frequencies,
    save_snapshot, Table, SNAPSHOT_VERSION,
};
use kwsearch_core::{DocumentLengthTable, Error, IndexPaths};
use tempfile::tempdir;

#[test]
fn save_then_load_round_trips_every_table() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let idx = build(library());
    let meta = save_snapshot(&paths, &idx).unwrap();
    assert_eq!(meta.num_docs, 5);
    assert_eq!(meta.version, SNAPSHOT_VERSION);

    assert_eq!(load_postings(&paths).unwrap(), idx.postings);
    assert_eq!(load_docmap(&paths).unwrap(), idx.docmap);
    assert_eq!(load_term_frequencies(&paths).unwrap(), idx.term_frequencies);
    assert_eq!(load_doc_lengths(&paths).unwrap(), idx.doc_lengths);
    assert_eq!(load_snapshot(&paths).unwrap(), idx);
}

#[test]
fn missing_snapshot_is_not_built() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("cache"));
    assert!(!paths.is_built());
    assert!(matches!(load_snapshot(&paths), Err(Error::NotBuilt { .. })));
    for table in Table::ALL {
        let res: Result<DocumentLengthTable, _> = load_table(&paths, table);
        assert!(matches!(res, Err(Error::NotBuilt { .. })), "{table}");
    }
}

#[test]
fn missing_table_file_is_not_built() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    save_snapshot(&paths, &build(movies())).unwrap();
    std::fs::remove_file(paths.table(Table::TermFrequencies)).unwrap();
    assert!(matches!(load_term_frequencies(&paths), Err(Error::NotBuilt { .. })));
    assert!(load_docmap(&paths).is_ok());
}

#[test]
fn rebuild_is_idempotent() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    save_snapshot(&paths, &build(library())).unwrap();
    let first = load_snapshot(&paths).unwrap();
    save_snapshot(&paths, &build(library())).unwrap();
    let second = load_snapshot(&paths).unwrap();
    assert_eq!(first, second);
}

#[test]
fn save_replaces_previous_snapshot() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    save_snapshot(&paths, &build(library())).unwrap();
    save_snapshot(&paths, &build(movies())).unwrap();
    let loaded = load_snapshot(&paths).unwrap();
    assert_eq!(loaded.num_docs(), 2);
    assert!(loaded.document(10).is_none());
    assert_eq!(load_meta(&paths).unwrap().num_docs, 2);
    // No staging files left behind.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn other_format_version_is_rejected() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    save_snapshot(&paths, &build(movies())).unwrap();
    std::fs::write(
        paths.meta(),
        r#"{"num_docs": 2, "num_terms": 8, "created_at": "2024-01-01T00:00:00Z", "version": 99}"#,
    )
    .unwrap();
    assert!(matches!(
        load_snapshot(&paths),
        Err(Error::IncompatibleSnapshot { found: 99, expected: SNAPSHOT_VERSION })
    ));
}

#[test]
fn meta_count_mismatch_is_inconsistent() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    save_snapshot(&paths, &build(movies())).unwrap();
    let json = format!(
        r#"{{"num_docs": 7, "num_terms": 8, "created_at": "2024-01-01T00:00:00Z", "version": {SNAPSHOT_VERSION}}}"#
    );
    std::fs::write(paths.meta(), json).unwrap();
    assert!(matches!(load_snapshot(&paths), Err(Error::Inconsistent(_))));
}
