//! Static synonym table used to widen queries before normalization.

use crate::tokenizer::tokenize;
use lazy_static::lazy_static;
use std::collections::HashMap;

const SYNONYM_TABLE: &[(&str, &[&str])] = &[
    // price and style adjectives
    ("cheap", &["affordable", "inexpensive", "low cost", "budget", "low-price"]),
    ("affordable", &["cheap", "budget"]),
    ("expensive", &["premium", "high-end", "luxury", "pricey"]),
    ("premium", &["luxury", "high-end", "expensive"]),
    ("comfortable", &["comfy", "soft", "relaxed"]),
    ("elegant", &["stylish", "classy", "refined"]),
    ("sport", &["sportswear", "athletic", "fitness"]),
    ("casual", &["everyday", "relaxed", "streetwear"]),
    ("formal", &["dressy", "smart", "office", "elegant"]),
    // colors
    ("red", &["maroon", "crimson", "burgundy"]),
    ("blue", &["navy", "sky blue", "royal blue"]),
    ("green", &["olive", "mint", "emerald"]),
    ("black", &["dark", "charcoal"]),
    ("white", &["ivory", "cream"]),
    ("yellow", &["gold", "mustard"]),
    ("pink", &["rose", "blush"]),
    ("brown", &["tan", "beige", "camel"]),
    // footwear
    ("shoes", &["shoe", "sneakers", "footwear", "trainers", "running shoes"]),
    ("shoe", &["shoes", "sneaker", "footwear"]),
    ("sneakers", &["running shoes", "trainers", "sports shoes"]),
    ("boots", &["ankle boots", "combat boots", "boot"]),
    // bottomwear
    ("pants", &["trousers", "bottoms", "slacks"]),
    ("trousers", &["pants", "bottomwear"]),
    ("jeans", &["denim", "denims", "skinny jeans", "slim jeans"]),
    // tops
    ("tshirt", &["t-shirt", "tee", "tees", "tshirts"]),
    ("t-shirt", &["tee", "tshirt", "shirt"]),
    ("shirt", &["top", "blouse"]),
    ("dress", &["gown", "one-piece", "maxi dress", "midi dress"]),
    ("jacket", &["coat", "outerwear", "blazer"]),
    ("bag", &["handbag", "purse", "tote"]),
    // gender and age
    ("women", &["woman", "ladies", "female"]),
    ("men", &["man", "male", "mens"]),
    ("kids", &["children", "child", "boy", "girl"]),
];

lazy_static! {
    static ref SYNONYMS: HashMap<&'static str, &'static [&'static str]> =
        SYNONYM_TABLE.iter().copied().collect();
}

/// Synonym phrases for a single word, looked up case-insensitively.
pub fn synonyms_for(word: &str) -> Option<&'static [&'static str]> {
    SYNONYMS.get(word.to_lowercase().as_str()).copied()
}

/// Append the synonyms of every query word to the (lowercased) query.
pub fn expand_query(query: &str) -> String {
    let mut expanded = query.to_lowercase();
    for word in query.split_whitespace() {
        if let Some(phrases) = synonyms_for(word) {
            expanded.push(' ');
            expanded.push_str(&phrases.join(" "));
        }
    }
    expanded
}

/// Ordered query term multiset: synonym expansion followed by normalization.
pub fn query_terms(query: &str) -> Vec<String> {
    tokenize(&expand_query(query))
}
