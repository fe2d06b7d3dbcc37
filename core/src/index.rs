use crate::document::Corpus;
use crate::scoring::tfidf;
use crate::tokenizer::tokenize;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

pub type TermId = u32;
pub type DocId = u32;

/// Shared, immutable index as handed to callers.
pub type IndexHandle = Arc<SearchIndex>;

/// Fields copied out of the corpus so results can be assembled without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    pub pid: String,
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

/// Per-document statistics derived from the normalized text blob.
#[derive(Debug, Clone)]
pub struct IndexedDoc {
    /// Normalized tokens in document order.
    pub tokens: Vec<TermId>,
    pub term_freqs: HashMap<TermId, u32>,
    /// Distinct normalized title terms, sorted.
    pub title_terms: Vec<TermId>,
    /// L2 norms of the TF-IDF vector, plain and smoothed idf.
    pub tfidf_norms: [f64; 2],
}

impl IndexedDoc {
    pub fn len(&self) -> usize { self.tokens.len() }

    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    pub fn tf(&self, term: TermId) -> u32 { self.term_freqs.get(&term).copied().unwrap_or(0) }

    pub fn title_contains(&self, term: TermId) -> bool { self.title_terms.binary_search(&term).is_ok() }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub num_docs: u32,
    pub total_len: u64,
    pub avg_doc_len: f64,
}

#[derive(Debug, Default)]
pub struct SearchIndex {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    df: Vec<u32>,
    docs: Vec<IndexedDoc>,
    meta: Vec<DocMeta>,
    stats: CorpusStats,
}

/// Build an index over `corpus`. An empty corpus yields an empty index.
pub fn build_index(corpus: &Corpus) -> IndexHandle {
    Arc::new(SearchIndex::build(corpus))
}

impl SearchIndex {
    pub fn build(corpus: &Corpus) -> Self {
        let start = Instant::now();
        let mut index = SearchIndex::default();

        // Doc ids follow pid order so rebuilds are reproducible.
        let mut docs: Vec<_> = corpus.iter().collect();
        docs.sort_by(|a, b| a.pid.cmp(&b.pid));

        for doc in docs {
            let tokens: Vec<TermId> = tokenize(&doc.indexable_text())
                .into_iter()
                .map(|term| index.intern(term))
                .collect();
            let mut term_freqs: HashMap<TermId, u32> = HashMap::new();
            for &tid in &tokens {
                *term_freqs.entry(tid).or_insert(0) += 1;
            }
            for &tid in term_freqs.keys() {
                index.df[tid as usize] += 1;
            }
            // Title tokens are a prefix of the blob, so every title term is interned already.
            let mut title_terms: Vec<TermId> = tokenize(&doc.title)
                .iter()
                .filter_map(|t| index.dictionary.get(t).copied())
                .collect();
            title_terms.sort_unstable();
            title_terms.dedup();

            index.stats.total_len += tokens.len() as u64;
            index.docs.push(IndexedDoc { tokens, term_freqs, title_terms, tfidf_norms: [0.0; 2] });
            index.meta.push(DocMeta {
                pid: doc.pid.clone(),
                title: doc.title.clone(),
                description: doc.description.clone(),
                price: doc.price,
                rating: doc.rating,
            });
        }

        index.stats.num_docs = index.docs.len() as u32;
        index.stats.avg_doc_len = if index.docs.is_empty() {
            0.0
        } else {
            index.stats.total_len as f64 / index.docs.len() as f64
        };
        index.compute_tfidf_norms();

        tracing::info!(
            num_docs = index.stats.num_docs,
            num_terms = index.terms.len(),
            avg_doc_len = index.stats.avg_doc_len,
            took_ms = start.elapsed().as_millis() as u64,
            "built search index"
        );
        index
    }

    fn intern(&mut self, term: String) -> TermId {
        if let Some(&tid) = self.dictionary.get(&term) {
            return tid;
        }
        let tid = self.terms.len() as TermId;
        self.dictionary.insert(term.clone(), tid);
        self.terms.push(term);
        self.df.push(0);
        tid
    }

    fn compute_tfidf_norms(&mut self) {
        let n = self.stats.num_docs;
        for doc in self.docs.iter_mut() {
            for (slot, smoothed) in [false, true].into_iter().enumerate() {
                let sum: f64 = doc
                    .term_freqs
                    .iter()
                    .map(|(&tid, &tf)| {
                        let w = tfidf::tf_weight(tf) * tfidf::idf(n, self.df[tid as usize], smoothed);
                        w * w
                    })
                    .sum();
                doc.tfidf_norms[slot] = sum.sqrt();
            }
        }
    }

    pub fn stats(&self) -> CorpusStats { self.stats }

    pub fn num_docs(&self) -> u32 { self.stats.num_docs }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn avg_doc_len(&self) -> f64 { self.stats.avg_doc_len }

    pub fn vocabulary_len(&self) -> usize { self.terms.len() }

    pub fn term_id(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }

    pub fn term(&self, tid: TermId) -> Option<&str> { self.terms.get(tid as usize).map(String::as_str) }

    /// Number of documents containing the term at least once.
    pub fn doc_freq(&self, tid: TermId) -> u32 { self.df.get(tid as usize).copied().unwrap_or(0) }

    pub fn doc(&self, doc_id: DocId) -> &IndexedDoc { &self.docs[doc_id as usize] }

    pub fn meta(&self, doc_id: DocId) -> &DocMeta { &self.meta[doc_id as usize] }

    pub fn doc_ids(&self) -> std::ops::Range<DocId> { 0..self.stats.num_docs }

    pub fn find_pid(&self, pid: &str) -> Option<DocId> {
        self.meta.iter().position(|m| m.pid == pid).map(|i| i as DocId)
    }

    /// Normalized tokens of a document, in order.
    pub fn doc_tokens(&self, doc_id: DocId) -> Vec<&str> {
        self.doc(doc_id).tokens.iter().filter_map(|&tid| self.term(tid)).collect()
    }

    /// Map query terms onto the vocabulary, keeping duplicates and order.
    /// Terms never seen in the corpus cannot score and are dropped.
    pub fn resolve(&self, terms: &[String]) -> Vec<TermId> {
        terms.iter().filter_map(|t| self.term_id(t)).collect()
    }
}

/// Lazily built, process-wide index slot. The first caller builds; callers
/// arriving during a cold build wait for it and share the result.
#[derive(Default)]
pub struct IndexCell {
    slot: RwLock<Option<IndexHandle>>,
}

impl IndexCell {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self) -> Option<IndexHandle> { self.slot.read().clone() }

    pub fn get_or_build(&self, corpus: &Corpus) -> IndexHandle {
        if let Some(index) = self.slot.read().as_ref() {
            return Arc::clone(index);
        }
        let guard = self.slot.upgradable_read();
        if let Some(index) = guard.as_ref() {
            return Arc::clone(index);
        }
        let index = build_index(corpus);
        let mut guard = RwLockUpgradableReadGuard::upgrade(guard);
        *guard = Some(Arc::clone(&index));
        index
    }

    /// Rebuild from `corpus` and swap the new index in. Readers keep
    /// whichever complete index they already hold.
    pub fn reload(&self, corpus: &Corpus) -> IndexHandle {
        let index = build_index(corpus);
        *self.slot.write() = Some(Arc::clone(&index));
        tracing::info!(num_docs = index.num_docs(), "reloaded search index");
        index
    }
}
