//! In-memory lexical search over a small product catalogue: synonym
//! expansion, light stemming, BM25 (or TF-IDF cosine) ranking with a
//! title-match boost.

pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod loader;
pub mod scoring;
pub mod search;
pub mod synonyms;
pub mod tokenizer;

pub use config::{ScorerKind, SearchConfig};
pub use document::{Corpus, Document};
pub use error::CorpusError;
pub use index::{build_index, CorpusStats, DocId, DocMeta, IndexCell, IndexHandle, SearchIndex, TermId};
pub use loader::load_corpus;
pub use search::{search, NavRef, Ranked, ResultRecord, SearchPage, Searcher};
