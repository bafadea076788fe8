//! Exports for external viewers
//!
//! - **Trace-viewer JSON**: `{"traceEvents":[...]}` with a begin and an end
//!   entry per operation, loadable in `chrome://tracing` or Perfetto
//! - **Folded stacks**: `CUDA;<name> <microseconds>`, one line per operation,
//!   compatible with `flamegraph.pl` and inferno. Stacks are a single level;
//!   no call hierarchy is reconstructed.
//! - **SVG**: the folded lines rendered with inferno

use crate::error::AnalyzeError;
use crate::matching::Operation;
use cuscope_shared::utils::time::secs_to_micros;
use inferno::flamegraph::{self, Options};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Root frame of every folded stack
pub const FLAME_ROOT: &str = "CUDA";

/// One trace-viewer entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent<'a> {
    pub name: &'a str,
    pub cat: &'static str,
    pub ph: &'static str,
    /// Microseconds
    pub ts: f64,
    pub pid: u32,
    pub tid: u32,
}

#[derive(Debug, Serialize)]
pub struct ChromeTrace<'a> {
    #[serde(rename = "traceEvents")]
    pub trace_events: Vec<TraceEvent<'a>>,
}

/// Build the trace-viewer document. Every operation lands on pid 1, tid 1.
pub fn chrome_trace(operations: &[Operation]) -> ChromeTrace<'_> {
    let mut trace_events = Vec::with_capacity(operations.len() * 2);
    for op in operations {
        for (ph, ts) in [("B", op.start), ("E", op.end)] {
            trace_events.push(TraceEvent {
                name: &op.name,
                cat: op.category.as_str(),
                ph,
                ts: secs_to_micros(ts),
                pid: 1,
                tid: 1,
            });
        }
    }
    ChromeTrace { trace_events }
}

/// Folded-stack lines, ordered by operation start
pub fn folded_lines(operations: &[Operation]) -> Vec<String> {
    let mut ordered: Vec<&Operation> = operations.iter().collect();
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start));
    ordered
        .into_iter()
        .map(|op| {
            let micros = secs_to_micros(op.duration).floor().max(0.0) as u64;
            format!("{};{} {}", FLAME_ROOT, op.name, micros)
        })
        .collect()
}

fn create(path: &Path) -> Result<BufWriter<File>, AnalyzeError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| AnalyzeError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> AnalyzeError + '_ {
    move |source| AnalyzeError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Write the trace-viewer JSON to `path`
pub fn write_chrome_trace(operations: &[Operation], path: &Path) -> Result<(), AnalyzeError> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, &chrome_trace(operations))?;
    writer.flush().map_err(write_error(path))?;
    info!("Chrome trace written to {} (open in chrome://tracing)", path.display());
    Ok(())
}

/// Write folded stacks to `path`
pub fn write_folded(operations: &[Operation], path: &Path) -> Result<(), AnalyzeError> {
    let mut writer = create(path)?;
    for line in folded_lines(operations) {
        writeln!(writer, "{}", line).map_err(write_error(path))?;
    }
    writer.flush().map_err(write_error(path))?;
    info!("Flamegraph data written to {}", path.display());
    Ok(())
}

/// Whether any folded line carries a nonzero count. inferno rejects input
/// whose samples are all zero.
pub fn has_samples(lines: &[String]) -> bool {
    lines.iter().any(|line| {
        line.rsplit_once(' ')
            .and_then(|(_, count)| count.parse::<u64>().ok())
            .is_some_and(|count| count > 0)
    })
}

/// Render folded lines to an SVG flamegraph at `path`.
///
/// Returns `false` without creating the file when there is nothing to draw.
pub fn write_svg(lines: &[String], path: &Path) -> Result<bool, AnalyzeError> {
    if !has_samples(lines) {
        return Ok(false);
    }

    let mut options = Options::default();
    options.title = "Driver call time".to_string();
    options.count_name = "us".to_string();

    let mut writer = create(path)?;
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut writer)
        .map_err(|e| AnalyzeError::Render(e.to_string()))?;
    writer.flush().map_err(write_error(path))?;
    info!("Flamegraph SVG written to {}", path.display());
    Ok(true)
}
