//! Structured error types for the analyzer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Failed to read trace file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode trace export: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to render flamegraph: {0}")]
    Render(String),
}
