//! Event log loading
//!
//! Lines that are blank are ignored; lines that do not parse as a log record
//! are reported and skipped so a partially corrupted capture still loads.

use crate::error::AnalyzeError;
use cuscope_shared::types::log::LogRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Records read from one log
#[derive(Debug, Default)]
pub struct LoadedLog {
    pub records: Vec<LogRecord>,
    /// Malformed lines that were skipped
    pub skipped: usize,
}

/// Load a JSON Lines event log from disk
pub fn load_log(path: &Path) -> Result<LoadedLog, AnalyzeError> {
    let file = File::open(path).map_err(|source| AnalyzeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = parse_log(BufReader::new(file)).map_err(|source| AnalyzeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Loaded {} records from {} ({} skipped)",
        loaded.records.len(),
        path.display(),
        loaded.skipped
    );
    Ok(loaded)
}

/// Parse log records from any buffered reader.
///
/// Only I/O failures are errors. Invalid UTF-8 and invalid JSON count as
/// malformed lines.
pub fn parse_log<R: BufRead>(reader: R) -> std::io::Result<LoadedLog> {
    let mut loaded = LoadedLog::default();

    for (index, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<LogRecord>(&line) {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                warn!("Skipping malformed line {}: {}", index + 1, e);
                loaded.skipped += 1;
            }
        }
    }

    Ok(loaded)
}
