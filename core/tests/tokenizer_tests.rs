use lexis_core::synonyms::{expand_query, query_terms};
use lexis_core::tokenizer::tokenize;

#[test]
fn it_lowercases_and_stems() {
    let words = tokenize("Running SHOES Played Parties");
    assert_eq!(words, vec!["runn", "shoe", "play", "party"]);
}

#[test]
fn it_filters_stopwords() {
    let words = tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.len(), 5);
}

#[test]
fn punctuation_stays_attached() {
    // only whitespace splits tokens
    assert_eq!(tokenize("t-shirt, low-price!"), vec!["t-shirt,", "low-price!"]);
}

#[test]
fn synonyms_feed_the_normalizer() {
    assert_eq!(expand_query("Black Jeans"), "black jeans dark charcoal denim denims skinny jeans slim jeans");
    let terms = query_terms("Black Jeans");
    assert_eq!(terms.iter().filter(|t| *t == "jean").count(), 3);
    assert!(terms.contains(&"charcoal".to_string()));
}
