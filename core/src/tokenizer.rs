use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "an", "and", "at", "by", "for", "from", "in", "is",
            "it", "of", "on", "that", "the", "this", "to", "with",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Suffix-stripping stemmer. First matching rule wins; tokens of three
/// characters or fewer are left alone.
pub fn stem(token: &str) -> String {
    if token.chars().count() <= 3 {
        return token.to_string();
    }
    if let Some(base) = token.strip_suffix("ies") {
        return format!("{base}y");
    }
    if let Some(base) = token.strip_suffix("ing") {
        return base.to_string();
    }
    if let Some(base) = token.strip_suffix("ed") {
        return base.to_string();
    }
    if token.chars().count() > 4 {
        if let Some(base) = token.strip_suffix('s') {
            return base.to_string();
        }
    }
    token.to_string()
}

/// Tokenize text: lowercase, split on whitespace, drop stopwords, stem.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .map(stem)
        .collect()
}
