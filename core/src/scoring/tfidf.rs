//! Cosine similarity over log-scaled, L2-normalized TF-IDF vectors.

use crate::index::{DocId, SearchIndex, TermId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TfIdf {
    /// ln(1 + N/df) instead of ln(N/df).
    pub smoothed_idf: bool,
}

pub fn tf_weight(tf: u32) -> f64 {
    if tf > 0 { 1.0 + (tf as f64).ln() } else { 0.0 }
}

pub fn idf(num_docs: u32, df: u32, smoothed: bool) -> f64 {
    if num_docs == 0 || df == 0 {
        return 0.0;
    }
    let ratio = num_docs as f64 / df as f64;
    if smoothed { (1.0 + ratio).ln() } else { ratio.ln() }
}

impl TfIdf {
    pub fn score(&self, index: &SearchIndex, query: &[TermId], doc_id: DocId) -> f64 {
        let doc = index.doc(doc_id);
        let doc_norm = doc.tfidf_norms[self.smoothed_idf as usize];
        if doc_norm == 0.0 {
            return 0.0;
        }
        let n = index.num_docs();

        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for &tid in query {
            *counts.entry(tid).or_insert(0) += 1;
        }
        let mut query_norm = 0.0;
        let mut dot = 0.0;
        for (&tid, &qtf) in counts.iter() {
            let idf = idf(n, index.doc_freq(tid), self.smoothed_idf);
            let q_w = tf_weight(qtf) * idf;
            query_norm += q_w * q_w;
            dot += q_w * tf_weight(doc.tf(tid)) * idf;
        }
        if query_norm == 0.0 {
            return 0.0;
        }
        dot / (query_norm.sqrt() * doc_norm)
    }
}
