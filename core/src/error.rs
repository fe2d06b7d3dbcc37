use std::path::PathBuf;
use thiserror::Error;

/// Failures while assembling a corpus. Search itself never fails.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path} (line {line}): {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse {path} (line {line}): {source}")]
    Csv {
        path: PathBuf,
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: expected a document, an array of documents, or a pid -> document map")]
    UnexpectedShape { path: PathBuf },
    #[error("duplicate document pid {0:?}")]
    DuplicatePid(String),
}

pub type Result<T, E = CorpusError> = std::result::Result<T, E>;
