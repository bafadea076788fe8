//! Load-and-match entry points

use crate::error::AnalyzeError;
use crate::log::{load_log, LoadedLog};
use crate::matching::{match_operations, Operation};
use cuscope_shared::types::log::LogRecord;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Counters describing how a log turned into operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub loaded: usize,
    pub skipped: usize,
    pub matched: usize,
    pub unmatched_ends: usize,
    pub open_begins: usize,
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loaded {} events", self.loaded)?;
        if self.skipped > 0 {
            writeln!(f, "Skipped {} malformed lines", self.skipped)?;
        }
        write!(f, "Matched {} operations", self.matched)?;
        if self.unmatched_ends > 0 || self.open_begins > 0 {
            write!(
                f,
                " ({} unmatched ends, {} still open)",
                self.unmatched_ends, self.open_begins
            )?;
        }
        Ok(())
    }
}

/// Completed operations of one log
#[derive(Debug, Default)]
pub struct Analysis {
    pub operations: Vec<Operation>,
    pub stats: LoadStats,
}

/// Pair already-loaded records. `skipped` is carried into the stats.
pub fn analyze_records(records: &[LogRecord], skipped: usize) -> Analysis {
    let matched = match_operations(records);
    Analysis {
        stats: LoadStats {
            loaded: records.len(),
            skipped,
            matched: matched.operations.len(),
            unmatched_ends: matched.unmatched_ends,
            open_begins: matched.open_begins,
        },
        operations: matched.operations,
    }
}

/// Load a log from disk and pair its records
pub fn analyze_file(path: &Path) -> Result<Analysis, AnalyzeError> {
    info!("Loading trace from: {}", path.display());
    let LoadedLog { records, skipped } = load_log(path)?;
    Ok(analyze_records(&records, skipped))
}
