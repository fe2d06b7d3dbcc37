use crate::document::{Corpus, Document};
use crate::error::{CorpusError, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    JsonLines,
    Csv,
}

impl Format {
    fn of(path: &Path) -> Option<Format> {
        match path.extension().and_then(|s| s.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Some(Format::Json),
            Some("jsonl") | Some("ndjson") => Some(Format::JsonLines),
            Some("csv") => Some(Format::Csv),
            _ => None,
        }
    }
}

/// Load a corpus from a `.json`, `.jsonl` or `.csv` file. If the file cannot
/// be loaded, sibling files in the other formats are tried in turn; when all
/// of them fail the last error is returned.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let path = path.as_ref();
    let primary = match Format::of(path) {
        Some(format) => load_as(path, format),
        None => load_as(path, Format::Json).or_else(|_| load_as(path, Format::JsonLines)),
    };
    let mut err = match primary {
        Ok(corpus) => return Ok(corpus),
        Err(err @ CorpusError::DuplicatePid(_)) => return Err(err),
        Err(err) => err,
    };

    for (fallback, format) in fallbacks_for(path) {
        tracing::warn!(path = %path.display(), fallback = %fallback.display(), error = %err, "corpus load failed, trying fallback");
        match load_as(&fallback, format) {
            Ok(corpus) => return Ok(corpus),
            Err(fallback_err) => err = fallback_err,
        }
    }
    Err(err)
}

/// `x.json` falls back to the cleaned export `x_clean.csv`, then `x.jsonl`;
/// `x.jsonl` and `x.csv` fall back to `x.json`.
fn fallbacks_for(path: &Path) -> Vec<(PathBuf, Format)> {
    let Some(format) = Format::of(path) else {
        return Vec::new();
    };
    match format {
        Format::Json => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            vec![
                (path.with_file_name(format!("{stem}_clean.csv")), Format::Csv),
                (path.with_extension("jsonl"), Format::JsonLines),
            ]
        }
        Format::JsonLines | Format::Csv => vec![(path.with_extension("json"), Format::Json)],
    }
}

fn load_as(path: &Path, format: Format) -> Result<Corpus> {
    let docs = match format {
        Format::Json => read_json(path)?,
        Format::JsonLines => read_jsonl(path)?,
        Format::Csv => read_csv(path)?,
    };
    let corpus = Corpus::from_documents(docs)?;
    tracing::info!(path = %path.display(), num_docs = corpus.len(), "loaded corpus");
    Ok(corpus)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| CorpusError::Io { path: path.to_path_buf(), source })
}

fn read_jsonl(path: &Path) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for (i, line) in open(path)?.lines().enumerate() {
        let line = line.map_err(|source| CorpusError::Io { path: path.to_path_buf(), source })?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: Document = serde_json::from_str(&line)
            .map_err(|source| CorpusError::Parse { path: path.to_path_buf(), line: i + 1, source })?;
        docs.push(doc);
    }
    Ok(docs)
}

// One document per row; the header names the fields.
fn read_csv(path: &Path) -> Result<Vec<Document>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(open(path)?);
    let docs = reader
        .deserialize::<Document>()
        .map(|row| {
            row.map_err(|source| CorpusError::Csv {
                path: path.to_path_buf(),
                line: source.position().map(|p| p.line() as usize).unwrap_or(0),
                source,
            })
        })
        .collect();
    docs
}

fn read_json(path: &Path) -> Result<Vec<Document>> {
    let parse_err = |source: serde_json::Error| CorpusError::Parse { path: path.to_path_buf(), line: 0, source };
    let json: Value = serde_json::from_reader(open(path)?).map_err(parse_err)?;
    match json {
        Value::Array(arr) => arr
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(parse_err))
            .collect(),
        Value::Object(obj) if obj.contains_key("pid") => {
            Ok(vec![serde_json::from_value(Value::Object(obj)).map_err(parse_err)?])
        }
        Value::Object(obj) => {
            // pid -> document; the key fills in a missing pid
            obj.into_iter()
                .map(|(pid, mut v)| {
                    if let Value::Object(fields) = &mut v {
                        fields.entry("pid").or_insert(Value::String(pid));
                    }
                    serde_json::from_value(v).map_err(parse_err)
                })
                .collect()
        }
        _ => Err(CorpusError::UnexpectedShape { path: path.to_path_buf() }),
    }
}
