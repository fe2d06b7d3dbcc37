use serde::{Deserialize, Serialize};

pub const BM25_K1: f64 = 1.5;
pub const BM25_B: f64 = 0.75;
pub const TITLE_BOOST: f64 = 1.05;
pub const DEFAULT_LIMIT: usize = 20;

/// Which relevance function ranks documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    #[default]
    Bm25,
    TfIdf,
}

impl std::str::FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bm25" => Ok(Self::Bm25),
            "tfidf" | "tf-idf" => Ok(Self::TfIdf),
            other => Err(format!("unknown scorer {other:?} (expected bm25 or tfidf)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub k1: f64,
    pub b: f64,
    /// Multiplier applied once when any query term appears in the title.
    pub title_boost: f64,
    pub default_limit: usize,
    pub scorer: ScorerKind,
    /// TF-IDF only: use ln(1 + N/df) instead of ln(N/df).
    pub smoothed_idf: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k1: BM25_K1,
            b: BM25_B,
            title_boost: TITLE_BOOST,
            default_limit: DEFAULT_LIMIT,
            scorer: ScorerKind::Bm25,
            smoothed_idf: false,
        }
    }
}
