//! Error types for loading comment threads.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a thread reference into comment records.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid thread reference: {0}")]
    InvalidReference(String),

    #[error("Failed to read thread from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed thread JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unrecognized thread format: {0}")]
    UnrecognizedFormat(String),
}
