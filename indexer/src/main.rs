use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lexis_core::{build_index, load_corpus, ScorerKind, SearchConfig, Searcher};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a BM25 index over a product corpus and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the corpus, build the index and print corpus statistics
    Build {
        /// Corpus file (.json or .jsonl)
        #[arg(long)]
        corpus: String,
    },
    /// Run a query against a freshly built index
    Query {
        /// Corpus file (.json or .jsonl)
        #[arg(long)]
        corpus: String,
        /// Free-text query
        #[arg(long, short)]
        q: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 20)]
        k: usize,
        /// Opaque search id embedded in result links
        #[arg(long, default_value = "0")]
        search_id: String,
        /// Relevance function: bm25 or tfidf
        #[arg(long, default_value = "bm25")]
        scorer: ScorerKind,
        /// Use smoothed IDF = ln(1 + N/df) for the tfidf scorer
        #[arg(long, default_value_t = false)]
        smoothed_idf: bool,
    },
}

#[derive(Serialize)]
struct BuildReport {
    num_docs: u32,
    num_terms: usize,
    total_len: u64,
    avg_doc_len: f64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus } => {
            let corpus = load_corpus(&corpus).with_context(|| format!("loading corpus {corpus}"))?;
            let index = build_index(&corpus);
            let stats = index.stats();
            let report = BuildReport {
                num_docs: stats.num_docs,
                num_terms: index.vocabulary_len(),
                total_len: stats.total_len,
                avg_doc_len: stats.avg_doc_len,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Query { corpus, q, k, search_id, scorer, smoothed_idf } => {
            let corpus = load_corpus(&corpus).with_context(|| format!("loading corpus {corpus}"))?;
            let index = build_index(&corpus);
            let searcher = Searcher::new(SearchConfig { scorer, smoothed_idf, ..SearchConfig::default() });
            let results = searcher.search_with_limit(&index, &q, &search_id, k);
            tracing::info!(query = %q, hits = results.len(), "query complete");
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }
    Ok(())
}
