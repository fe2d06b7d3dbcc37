use crate::error::{CorpusError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A catalogue entry. Text fields default to empty; price and rating are
/// carried through to results but never scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(deserialize_with = "string_or_number")]
    pub pid: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sub_category: String,
    #[serde(default, alias = "selling_price", deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, alias = "average_rating", deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
}

impl Document {
    pub fn new(pid: impl Into<String>, title: impl Into<String>) -> Self {
        Self { pid: pid.into(), title: title.into(), ..Self::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Text blob that gets indexed: title, description, brand, category, sub-category.
    pub fn indexable_text(&self) -> String {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.brand.as_str(),
            self.category.as_str(),
            self.sub_category.as_str(),
        ]
        .join(" ")
    }
}

/// Documents keyed by pid. Read-only once handed to the indexer.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    docs: HashMap<String, Document>,
}

impl Corpus {
    pub fn new() -> Self { Self::default() }

    /// Collect documents, rejecting duplicate pids.
    pub fn from_documents<I: IntoIterator<Item = Document>>(docs: I) -> Result<Self> {
        let mut corpus = Self::new();
        for doc in docs {
            corpus.insert(doc)?;
        }
        Ok(corpus)
    }

    pub fn insert(&mut self, doc: Document) -> Result<()> {
        if self.docs.contains_key(&doc.pid) {
            return Err(CorpusError::DuplicatePid(doc.pid));
        }
        self.docs.insert(doc.pid.clone(), doc);
        Ok(())
    }

    pub fn get(&self, pid: &str) -> Option<&Document> { self.docs.get(pid) }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Document> { self.docs.values() }
}

fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    use serde::de::Error;
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("pid must be a string or number, got {other}"))),
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

// Catalogue dumps store prices as "1,299" as often as 1299.
fn lenient_number<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<f64>, D::Error> {
    Ok(match serde_json::Value::deserialize(de)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    })
}
