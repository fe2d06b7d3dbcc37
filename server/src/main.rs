use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use lexis_core::{load_corpus, ScorerKind, SearchConfig};
use server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Corpus file (.json or .jsonl)
    #[arg(long, default_value = "./data/products.json")]
    corpus: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Relevance function: bm25 or tfidf
    #[arg(long, default_value = "bm25")]
    scorer: ScorerKind,
    /// Use smoothed IDF = ln(1 + N/df) for the tfidf scorer
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    // Refuse to serve without a corpus: a failed load is fatal.
    let corpus = load_corpus(&args.corpus).with_context(|| format!("loading corpus {}", args.corpus))?;
    let config = SearchConfig { scorer: args.scorer, smoothed_idf: args.smoothed_idf, ..SearchConfig::default() };
    let app: Router = build_app(corpus, config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
