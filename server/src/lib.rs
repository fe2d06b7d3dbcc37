use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use lexis_core::{Corpus, Document, IndexCell, IndexHandle, ResultRecord, SearchConfig, Searcher};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    /// Opaque id echoed into result links; generated when absent.
    pub search_id: Option<String>,
}
fn default_k() -> usize { lexis_core::config::DEFAULT_LIMIT }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub search_id: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub record: ResultRecord,
    pub snippet: String,
}

#[derive(Deserialize)]
pub struct DocParams {
    pub search_id: Option<String>,
    pub rank: Option<usize>,
}

#[derive(Serialize)]
pub struct DocResponse {
    #[serde(flatten)]
    pub doc: Document,
    pub search_id: Option<String>,
    pub rank: Option<usize>,
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<Corpus>,
    pub index: Arc<IndexCell>,
    pub searcher: Arc<Searcher>,
    next_search_id: Arc<AtomicU64>,
}

impl AppState {
    /// Build the index up front so no request ever waits on a cold build.
    pub fn new(corpus: Corpus, config: SearchConfig) -> Self {
        let index = IndexCell::new();
        index.get_or_build(&corpus);
        Self {
            corpus: Arc::new(corpus),
            index: Arc::new(index),
            searcher: Arc::new(Searcher::new(config)),
            next_search_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_app(corpus: Corpus, config: SearchConfig) -> Result<Router> {
    let app_state = AppState::new(corpus, config);

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:pid", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let search_id = params
        .search_id
        .clone()
        .unwrap_or_else(|| state.next_search_id.fetch_add(1, Ordering::Relaxed).to_string());
    let k = params.k.min(100);
    let index: IndexHandle = state.index.get_or_build(&state.corpus);
    let page = state.searcher.search_page(&index, &params.q, &search_id, k);

    let raw_terms: Vec<String> = params.q.split_whitespace().map(|s| s.to_string()).collect();
    let results: Vec<SearchHit> = page
        .results
        .into_iter()
        .map(|record| {
            let snippet = snippet(&record.description, &raw_terms);
            SearchHit { record, snippet }
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::info!(query = %params.q, %search_id, hits = results.len(), took_ms = elapsed.as_millis() as u64, "search");
    Json(SearchResponse { query: params.q, search_id, took_s: elapsed.as_secs_f64(), total_hits: page.total_hits, results })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    Query(params): Query<DocParams>,
) -> Result<Json<DocResponse>, (StatusCode, String)> {
    let doc = state
        .corpus
        .get(&pid)
        .cloned()
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("no document with pid {pid}")))?;
    tracing::info!(%pid, search_id = ?params.search_id, rank = ?params.rank, "document opened");
    Ok(Json(DocResponse { doc, search_id: params.search_id, rank: params.rank }))
}

/// Up to 200 characters of the description around the first raw query
/// word, with every raw word wrapped in `<em>`.
fn snippet(text: &str, raw_terms: &[String]) -> String {
    if text.is_empty() {
        return String::new();
    }
    let lower = text.to_lowercase();
    let first_idx = raw_terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .find_map(|t| lower.find(&t.to_lowercase()));
    // to_lowercase can shift byte offsets; work in chars from here on
    let chars: Vec<char> = text.chars().collect();
    let start = first_idx
        .map(|idx| lower[..idx].chars().count().saturating_sub(60))
        .unwrap_or(0)
        .min(chars.len());
    let end = (start + 200).min(chars.len());
    let window: String = chars[start..end].iter().collect();
    highlight_terms(&window, raw_terms)
}

fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    let words: Vec<String> = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| regex::escape(t))
        .collect();
    if words.is_empty() {
        return snippet.to_string();
    }
    match regex::RegexBuilder::new(&words.join("|")).case_insensitive(true).build() {
        Ok(pat) => pat.replace_all(snippet, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).to_string(),
        Err(_) => snippet.to_string(),
    }
}
