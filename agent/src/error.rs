//! Structured error types for the live tracer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Could not find {library} (searched: {})", searched.join(", "))]
    LibraryNotFound {
        library: String,
        searched: Vec<String>,
    },

    #[error("Live tracing requires root privileges (try: sudo {0})")]
    InsufficientPrivilege(String),

    #[error("Failed to read symbol table of {path}: {reason}")]
    SymbolTable { path: PathBuf, reason: String },

    #[error("Failed to attach {program} to {target}: {reason}")]
    ProbeAttach {
        program: String,
        target: String,
        reason: String,
    },

    #[error("Failed to load probe object: {0}")]
    ProbeLoad(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
