//! Relevance functions. Both variants score one indexed document against a
//! resolved query term multiset; the ranker treats them identically.

pub mod bm25;
pub mod tfidf;

use crate::config::{ScorerKind, SearchConfig};
use crate::index::{DocId, SearchIndex, TermId};

pub use bm25::Bm25;
pub use tfidf::TfIdf;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scorer {
    Bm25(Bm25),
    TfIdf(TfIdf),
}

impl Scorer {
    pub fn from_config(config: &SearchConfig) -> Self {
        match config.scorer {
            ScorerKind::Bm25 => Scorer::Bm25(Bm25 { k1: config.k1, b: config.b }),
            ScorerKind::TfIdf => Scorer::TfIdf(TfIdf { smoothed_idf: config.smoothed_idf }),
        }
    }

    pub fn score(&self, index: &SearchIndex, query: &[TermId], doc_id: DocId) -> f64 {
        match self {
            Scorer::Bm25(s) => s.score(index, query, doc_id),
            Scorer::TfIdf(s) => s.score(index, query, doc_id),
        }
    }
}

impl Default for Scorer {
    fn default() -> Self { Scorer::Bm25(Bm25::default()) }
}
