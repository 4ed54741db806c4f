use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an analysis run.
///
/// Degenerate input (missing boilerplate markers, missing `Title:` lines,
/// empty documents) is not an error; those paths are logged and analysed
/// with defaults.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no input files matching '{pattern}' found in {}", dir.display())]
    NoInputFiles { pattern: String, dir: PathBuf },
    #[error("invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sentiment lexicon unavailable at {}: {reason}", path.display())]
    LexiconUnavailable { path: PathBuf, reason: String },
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}
