use crate::error::{Error, Result};
use crate::index::{count_u32, DocumentLengthTable, DocumentMap, IndexArtifacts, PostingsIndex, TermFrequencyTable};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, create_dir_all, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
}

/// The named tables of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Postings,
    DocMap,
    TermFrequencies,
    DocLengths,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Postings, Table::DocMap, Table::TermFrequencies, Table::DocLengths];

    pub fn file_name(self) -> &'static str {
        match self {
            Table::Postings => "index.bin",
            Table::DocMap => "docmap.bin",
            Table::TermFrequencies => "term_frequencies.bin",
            Table::DocLengths => "doc_lengths.bin",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Table::Postings => "postings index",
            Table::DocMap => "document map",
            Table::TermFrequencies => "term frequencies",
            Table::DocLengths => "document lengths",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn table(&self, table: Table) -> PathBuf { self.root.join(table.file_name()) }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    /// A snapshot exists once its `meta.json` has been committed.
    pub fn is_built(&self) -> bool { self.meta().is_file() }

    fn not_built(&self) -> Error {
        Error::NotBuilt { root: self.root.clone() }
    }
}

/// Write all four tables as one snapshot, replacing whatever was there.
///
/// `meta.json` is removed first and written last, so an interrupted save leaves the
/// directory in the not-built state rather than pairing old metadata with new tables.
pub fn save_snapshot(paths: &IndexPaths, artifacts: &IndexArtifacts) -> Result<MetaFile> {
    create_dir_all(&paths.root)?;
    match fs::remove_file(paths.meta()) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    save_table(paths, Table::Postings, &artifacts.postings)?;
    save_table(paths, Table::DocMap, &artifacts.docmap)?;
    save_table(paths, Table::TermFrequencies, &artifacts.term_frequencies)?;
    save_table(paths, Table::DocLengths, &artifacts.doc_lengths)?;

    let meta = MetaFile {
        num_docs: count_u32(artifacts.num_docs(), "document count")?,
        num_terms: count_u32(artifacts.num_terms(), "term count")?,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: SNAPSHOT_VERSION,
    };
    let json = serde_json::to_string_pretty(&meta)?;
    write_atomic(&paths.meta(), json.as_bytes())?;

    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, num_terms = meta.num_terms, "saved snapshot");
    Ok(meta)
}

fn save_table<T: Serialize>(paths: &IndexPaths, table: Table, value: &T) -> Result<()> {
    let bytes = bincode::serialize(value)?;
    write_atomic(&paths.table(table), &bytes)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    let mut f = File::create(&tmp)?;
    f.write_all(bytes)?;
    f.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let buf = read_or_not_built(paths, &paths.meta())?;
    let meta: MetaFile = serde_json::from_slice(&buf)?;
    if meta.version != SNAPSHOT_VERSION {
        return Err(Error::IncompatibleSnapshot { found: meta.version, expected: SNAPSHOT_VERSION });
    }
    Ok(meta)
}

/// Load one table of a committed snapshot.
pub fn load_table<T: DeserializeOwned>(paths: &IndexPaths, table: Table) -> Result<T> {
    load_meta(paths)?;
    read_table(paths, table)
}

pub fn load_postings(paths: &IndexPaths) -> Result<PostingsIndex> {
    load_table(paths, Table::Postings)
}

pub fn load_docmap(paths: &IndexPaths) -> Result<DocumentMap> {
    load_table(paths, Table::DocMap)
}

pub fn load_term_frequencies(paths: &IndexPaths) -> Result<TermFrequencyTable> {
    load_table(paths, Table::TermFrequencies)
}

pub fn load_doc_lengths(paths: &IndexPaths) -> Result<DocumentLengthTable> {
    load_table(paths, Table::DocLengths)
}

/// Load all four tables and check them against each other and the metadata.
pub fn load_snapshot(paths: &IndexPaths) -> Result<IndexArtifacts> {
    let meta = load_meta(paths)?;
    let artifacts = IndexArtifacts {
        postings: read_table(paths, Table::Postings)?,
        docmap: read_table(paths, Table::DocMap)?,
        term_frequencies: read_table(paths, Table::TermFrequencies)?,
        doc_lengths: read_table(paths, Table::DocLengths)?,
    };
    if artifacts.num_docs() != meta.num_docs as usize {
        return Err(Error::Inconsistent(format!(
            "meta.json records {} documents but the document map holds {}",
            meta.num_docs,
            artifacts.num_docs()
        )));
    }
    artifacts.verify()?;

    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, created_at = %meta.created_at, "loaded snapshot");
    Ok(artifacts)
}

fn read_table<T: DeserializeOwned>(paths: &IndexPaths, table: Table) -> Result<T> {
    let buf = read_or_not_built(paths, &paths.table(table))?;
    let value = bincode::deserialize(&buf)?;
    tracing::debug!(%table, bytes = buf.len(), "read table");
    Ok(value)
}

fn read_or_not_built(paths: &IndexPaths, path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            paths.not_built()
        } else {
            e.into()
        }
    })
}
