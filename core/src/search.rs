use crate::config::SearchConfig;
use crate::index::{DocId, SearchIndex, TermId};
use crate::scoring::Scorer;
use crate::synonyms::query_terms;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

/// Link back to a result's detail page, tagged with the originating search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavRef {
    pub pid: String,
    pub search_id: String,
    pub rank: usize,
}

impl fmt::Display for NavRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc_details?pid={}&search_id={}&rank={}", self.pid, self.search_id, self.rank)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub pid: String,
    pub title: String,
    pub description: String,
    pub score: f64,
    /// 1-based position in the final ordering.
    pub rank: usize,
    pub url: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

impl ResultRecord {
    pub fn nav_ref(&self, search_id: &str) -> NavRef {
        NavRef { pid: self.pid.clone(), search_id: search_id.to_string(), rank: self.rank }
    }
}

/// One page of results plus the number of documents that matched before
/// the page was cut.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub total_hits: usize,
    pub results: Vec<ResultRecord>,
}

/// Scored documents in final order, truncated, with the untruncated match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranked {
    pub total_hits: usize,
    pub hits: Vec<(DocId, f64)>,
}

/// Ranks every indexed document against a query.
#[derive(Debug, Clone, Default)]
pub struct Searcher {
    config: SearchConfig,
    scorer: Scorer,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        let scorer = Scorer::from_config(&config);
        Self { config, scorer }
    }

    pub fn config(&self) -> &SearchConfig { &self.config }

    /// Search with the configured default limit.
    pub fn search(&self, index: &SearchIndex, query: &str, search_id: &str) -> Vec<ResultRecord> {
        self.search_with_limit(index, query, search_id, self.config.default_limit)
    }

    pub fn search_with_limit(
        &self,
        index: &SearchIndex,
        query: &str,
        search_id: &str,
        limit: usize,
    ) -> Vec<ResultRecord> {
        self.search_page(index, query, search_id, limit).results
    }

    pub fn search_page(&self, index: &SearchIndex, query: &str, search_id: &str, limit: usize) -> SearchPage {
        let start = Instant::now();
        let terms = index.resolve(&query_terms(query));
        let ranked = self.rank(index, &terms, limit);
        let results: Vec<ResultRecord> = ranked
            .hits
            .into_iter()
            .enumerate()
            .map(|(i, (doc_id, score))| {
                let meta = index.meta(doc_id);
                let rank = i + 1;
                let nav = NavRef { pid: meta.pid.clone(), search_id: search_id.to_string(), rank };
                ResultRecord {
                    pid: meta.pid.clone(),
                    title: meta.title.clone(),
                    description: meta.description.clone(),
                    score,
                    rank,
                    url: nav.to_string(),
                    price: meta.price,
                    rating: meta.rating,
                }
            })
            .collect();
        tracing::debug!(
            query,
            search_id,
            terms = terms.len(),
            total_hits = ranked.total_hits,
            hits = results.len(),
            took_us = start.elapsed().as_micros() as u64,
            "search"
        );
        SearchPage { total_hits: ranked.total_hits, results }
    }

    /// Score, boost, sort and truncate. Ties break on pid ascending.
    pub fn rank(&self, index: &SearchIndex, terms: &[TermId], limit: usize) -> Ranked {
        if terms.is_empty() {
            return Ranked::default();
        }
        let mut hits = self.score_all(index, terms);
        let total_hits = hits.len();
        hits.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => index.meta(a.0).pid.cmp(&index.meta(b.0).pid),
            other => other,
        });
        hits.truncate(limit);
        Ranked { total_hits, hits }
    }

    /// Boosted score of one document, or `None` when it does not match.
    pub fn score_doc(&self, index: &SearchIndex, terms: &[TermId], doc_id: DocId) -> Option<f64> {
        let score = self.scorer.score(index, terms, doc_id);
        if score <= 0.0 || score.is_nan() {
            return None;
        }
        Some(apply_title_boost(index, terms, doc_id, score, self.config.title_boost))
    }

    #[cfg(not(feature = "parallel"))]
    fn score_all(&self, index: &SearchIndex, terms: &[TermId]) -> Vec<(DocId, f64)> {
        index
            .doc_ids()
            .filter_map(|doc_id| self.score_doc(index, terms, doc_id).map(|s| (doc_id, s)))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn score_all(&self, index: &SearchIndex, terms: &[TermId]) -> Vec<(DocId, f64)> {
        use rayon::prelude::*;
        index
            .doc_ids()
            .into_par_iter()
            .filter_map(|doc_id| self.score_doc(index, terms, doc_id).map(|s| (doc_id, s)))
            .collect()
    }
}

/// Multiply by `boost` once if any query term is a title term.
pub fn apply_title_boost(index: &SearchIndex, terms: &[TermId], doc_id: DocId, score: f64, boost: f64) -> f64 {
    let doc = index.doc(doc_id);
    if terms.iter().any(|&tid| doc.title_contains(tid)) {
        score * boost
    } else {
        score
    }
}

/// BM25 search with default settings.
pub fn search(index: &SearchIndex, query: &str, search_id: &str, limit: usize) -> Vec<ResultRecord> {
    Searcher::default().search_with_limit(index, query, search_id, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScorerKind;
    use crate::document::{Corpus, Document};
    use crate::index::SearchIndex;

    fn catalogue() -> SearchIndex {
        SearchIndex::build(
            &Corpus::from_documents(vec![
                Document::new("P1", "Blue Running Shoes").with_description("Comfortable sport shoe"),
                Document::new("P2", "Red Dress"),
                Document::new("P3", "Leather Belt").with_description("goes with shoes"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn cheap_shoes_finds_only_shoes() {
        let index = catalogue();
        let results = search(&index, "cheap shoes", "7", 20);
        assert!(results.iter().any(|r| r.pid == "P1" && r.score > 0.0));
        assert!(results.iter().all(|r| r.pid != "P2"));
        assert_eq!(results[0].pid, "P1");
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[0].url, "doc_details?pid=P1&search_id=7&rank=1");
    }

    #[test]
    fn title_match_is_boosted_once() {
        let index = catalogue();
        let terms = index.resolve(&query_terms("shoes"));
        let p1 = index.find_pid("P1").unwrap();
        let p3 = index.find_pid("P3").unwrap();
        let searcher = Searcher::default();

        let raw = searcher.scorer.score(&index, &terms, p1);
        let boosted = searcher.score_doc(&index, &terms, p1).unwrap();
        assert!((boosted - raw * 1.05).abs() < 1e-12);

        let raw3 = searcher.scorer.score(&index, &terms, p3);
        assert_eq!(searcher.score_doc(&index, &terms, p3), Some(raw3));
    }

    #[test]
    fn limit_truncates_and_ranks() {
        let index = catalogue();
        assert!(search(&index, "shoes", "s", 0).is_empty());
        let one = search(&index, "shoes", "s", 1);
        assert_eq!(one.len(), 1);
        let all = search(&index, "shoes", "s", 10);
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2]);
        assert!(all[0].score >= all[1].score);
    }

    #[test]
    fn total_hits_counts_before_truncation() {
        let index = catalogue();
        let page = Searcher::default().search_page(&index, "shoes", "s", 1);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.total_hits, 2);
        assert_eq!(Searcher::default().search_page(&index, "shoes", "s", 0).total_hits, 2);
        assert_eq!(Searcher::default().search_page(&index, "laptop", "s", 5), SearchPage::default());
    }

    #[test]
    fn ties_break_on_pid() {
        let index = SearchIndex::build(
            &Corpus::from_documents(vec![
                Document::new("z9", "silk scarf"),
                Document::new("a1", "silk scarf"),
                Document::new("m5", "silk scarf"),
                Document::new("q0", "wool hat"),
            ])
            .unwrap(),
        );
        let pids: Vec<String> = search(&index, "scarf", "s", 10).into_iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec!["a1", "m5", "z9"]);
    }

    #[test]
    fn degenerate_inputs_return_empty() {
        let empty = SearchIndex::build(&Corpus::new());
        assert!(search(&empty, "anything", "s", 10).is_empty());
        let index = catalogue();
        assert!(search(&index, "", "s", 10).is_empty());
        assert!(search(&index, "the and of", "s", 10).is_empty());
        assert!(search(&index, "laptop", "s", 10).is_empty());
    }

    #[test]
    fn tfidf_scorer_is_selectable() {
        let index = catalogue();
        let searcher = Searcher::new(SearchConfig { scorer: ScorerKind::TfIdf, ..SearchConfig::default() });
        let results = searcher.search(&index, "running shoes", "s");
        assert_eq!(results[0].pid, "P1");
        assert!(results.iter().all(|r| r.score > 0.0));
    }

    #[test]
    fn nav_ref_formats_like_url() {
        let index = catalogue();
        let r = &search(&index, "dress", "abc", 5)[0];
        assert_eq!(r.nav_ref("abc").to_string(), r.url);
    }
}
