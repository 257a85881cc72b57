mod corpus;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kwsearch_core::persist::save_snapshot;
use kwsearch_core::{Bm25Params, DocId, IndexBuilder, IndexPaths, QueryEngine, Tokenizer, BM25_B, BM25_K1};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "keyword-search")]
#[command(about = "Keyword search over a movie corpus with TF-IDF and BM25", long_about = None)]
struct Cli {
    /// Index directory path
    #[arg(long, global = true, env = "KWSEARCH_INDEX", default_value = "./cache")]
    index: PathBuf,
    /// Stopword list, one word per line (defaults to the built-in English list)
    #[arg(long, global = true, env = "KWSEARCH_STOPWORDS")]
    stopwords: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the inverted index from the movie corpus
    Build {
        /// Input path (.json, .jsonl or a directory of them)
        #[arg(long, default_value = "./data/movies.json")]
        input: PathBuf,
    },
    /// List documents containing any query word, ordered by id
    Search {
        query: String,
        #[arg(default_value_t = 5)]
        limit: usize,
    },
    /// Rank documents for a query with BM25
    #[command(name = "bm25search")]
    Bm25Search {
        query: String,
        #[arg(default_value_t = 5)]
        limit: usize,
        #[arg(long, default_value_t = BM25_K1)]
        k1: f64,
        #[arg(long, default_value_t = BM25_B)]
        b: f64,
    },
    /// Occurrences of a term in one document
    Tf { doc_id: DocId, term: String },
    /// Classic inverse document frequency of a term
    Idf { term: String },
    /// TF-IDF of a term in one document
    Tfidf { doc_id: DocId, term: String },
    /// Saturated BM25 term frequency of a term in one document
    #[command(name = "bm25tf")]
    Bm25Tf {
        doc_id: DocId,
        term: String,
        #[arg(default_value_t = BM25_K1)]
        k1: f64,
        #[arg(default_value_t = BM25_B)]
        b: f64,
    },
    /// BM25 inverse document frequency of a term
    #[command(name = "bm25idf")]
    Bm25Idf { term: String },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let tokenizer = match &cli.stopwords {
        Some(path) => Tokenizer::from_stopwords_file(path)
            .with_context(|| format!("reading stopwords from {}", path.display()))?,
        None => Tokenizer::default(),
    };
    let paths = IndexPaths::new(&cli.index);

    // Query commands load the snapshot once; a missing snapshot fails with NotBuilt.
    let open = || QueryEngine::open_with(&paths, tokenizer.clone());
    match cli.command {
        Commands::Build { input } => build_index(&input, &paths, &tokenizer)?,
        Commands::Search { query, limit } => {
            let engine = open()?;
            println!("Searching for: {query}");
            for (rank, doc_id) in engine.search(&query, limit).into_iter().enumerate() {
                println!("{}. {}", rank + 1, title(&engine, doc_id));
            }
        }
        Commands::Bm25Search { query, limit, k1, b } => {
            let params = Bm25Params::new(k1, b)?;
            let engine = open()?;
            let hits = engine.bm25_search(&query, limit, params);
            for (rank, hit) in hits.into_iter().enumerate() {
                println!("{}. ({}) {} - Score: {:.2}", rank + 1, hit.doc_id, title(&engine, hit.doc_id), hit.score);
            }
        }
        Commands::Tf { doc_id, term } => {
            let engine = open()?;
            let tf = engine.get_tf(doc_id, &term)?;
            println!("Term frequency of '{term}' in document '{doc_id}': {tf}");
        }
        Commands::Idf { term } => {
            let engine = open()?;
            let idf = engine.get_idf(&term)?;
            println!("Inverse document frequency of '{term}': {idf:.2}");
        }
        Commands::Tfidf { doc_id, term } => {
            let engine = open()?;
            let tf_idf = engine.get_tfidf(doc_id, &term)?;
            println!("TF-IDF score of '{term}' in document '{doc_id}': {tf_idf:.2}");
        }
        Commands::Bm25Tf { doc_id, term, k1, b } => {
            let params = Bm25Params::new(k1, b)?;
            let engine = open()?;
            let bm25_tf = engine.get_bm25_tf(doc_id, &term, params)?;
            println!("BM25 TF score of '{term}' in document '{doc_id}': {bm25_tf:.2}");
        }
        Commands::Bm25Idf { term } => {
            let engine = open()?;
            let bm25_idf = engine.get_bm25_idf(&term)?;
            println!("BM25 IDF score of '{term}': {bm25_idf:.2}");
        }
    }
    Ok(())
}

fn build_index(input: &Path, paths: &IndexPaths, tokenizer: &Tokenizer) -> Result<()> {
    let docs = corpus::load_corpus(input)?;
    let artifacts = IndexBuilder::new(tokenizer).build(docs)?;
    let meta = save_snapshot(paths, &artifacts)?;
    tracing::info!(output = %paths.root.display(), num_docs = meta.num_docs, "index build complete");
    Ok(())
}

fn title(engine: &QueryEngine, doc_id: DocId) -> &str {
    engine.document(doc_id).map_or("<unknown>", |doc| doc.title.as_str())
}
