//! Okapi BM25.

use crate::config::{BM25_B, BM25_K1};
use crate::index::{DocId, SearchIndex, TermId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25 {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25 {
    fn default() -> Self { Self { k1: BM25_K1, b: BM25_B } }
}

/// ln((N - df + 0.5) / (df + 0.5) + 1). Not clamped.
pub fn idf(num_docs: u32, df: u32) -> f64 {
    let n = num_docs as f64;
    let df = df as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

impl Bm25 {
    /// Sum of per-term contributions. Every occurrence of a term in the query
    /// multiset contributes; terms absent from the document add nothing.
    pub fn score(&self, index: &SearchIndex, query: &[TermId], doc_id: DocId) -> f64 {
        let avgdl = index.avg_doc_len();
        if avgdl <= 0.0 {
            return 0.0;
        }
        let doc = index.doc(doc_id);
        let dl = doc.len() as f64;
        let n = index.num_docs();
        let norm = self.k1 * (1.0 - self.b + self.b * dl / avgdl);

        query
            .iter()
            .filter_map(|&tid| {
                let f = doc.tf(tid);
                if f == 0 {
                    return None;
                }
                let f = f as f64;
                Some(idf(n, index.doc_freq(tid)) * (f * (self.k1 + 1.0)) / (f + norm))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Corpus, Document};

    fn index() -> SearchIndex {
        SearchIndex::build(
            &Corpus::from_documents(vec![
                Document::new("a", "linen shirt linen"),
                Document::new("b", "cotton shirt"),
                Document::new("c", "wool scarf"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn idf_matches_formula() {
        assert!((idf(2, 1) - 2f64.ln()).abs() < 1e-12);
        // (3 - 3 + 0.5) / 3.5 + 1
        assert!((idf(3, 3) - (1.0f64 + 0.5 / 3.5).ln()).abs() < 1e-12);
    }

    #[test]
    fn single_term_score() {
        let index = index();
        let linen = index.term_id("linen").unwrap();
        let a = index.find_pid("a").unwrap();
        // avgdl = 7/3, dl = 3, f = 2, df = 1, N = 3
        let avgdl = 7.0 / 3.0;
        let norm = 1.5 * (1.0 - 0.75 + 0.75 * 3.0 / avgdl);
        let expected = idf(3, 1) * (2.0 * 2.5) / (2.0 + norm);
        let got = Bm25::default().score(&index, &[linen], a);
        assert!((got - expected).abs() < 1e-12);
    }

    #[test]
    fn duplicate_query_terms_count_twice() {
        let index = index();
        let shirt = index.term_id("shirt").unwrap();
        let b = index.find_pid("b").unwrap();
        let once = Bm25::default().score(&index, &[shirt], b);
        let twice = Bm25::default().score(&index, &[shirt, shirt], b);
        assert!((twice - 2.0 * once).abs() < 1e-12);
    }

    #[test]
    fn no_overlap_scores_zero() {
        let index = index();
        let scarf = index.term_id("scarf").unwrap();
        let a = index.find_pid("a").unwrap();
        assert_eq!(Bm25::default().score(&index, &[scarf], a), 0.0);
        assert_eq!(Bm25::default().score(&index, &[], a), 0.0);
    }

    #[test]
    fn zero_average_length_is_guarded() {
        let index = SearchIndex::build(
            &Corpus::from_documents(vec![Document::new("x", "the and of")]).unwrap(),
        );
        assert_eq!(index.avg_doc_len(), 0.0);
        assert_eq!(Bm25::default().score(&index, &[0], 0), 0.0);
    }
}
