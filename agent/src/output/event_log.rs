//! Event log writer
//!
//! Appends one JSON line per emitted event. Writes are buffered and flushed
//! every `flush_every` records and once more when the writer is finished; a
//! crash loses at most the records written since the last flush.

use anyhow::{Context, Result};
use cuscope_shared::types::events::{Event, EventKind, EventPayload, Timestamp};
use cuscope_shared::types::log::{LogRecord, OpId, Phase};
use cuscope_shared::utils::time::relative_secs;
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Phase an event kind is persisted with
pub fn phase_for(kind: EventKind) -> Phase {
    match kind {
        EventKind::CallEnter | EventKind::IoctlEnter => Phase::Begin,
        EventKind::CallExit | EventKind::IoctlExit => Phase::End,
        EventKind::KernelLaunch | EventKind::MemoryAlloc | EventKind::MemoryCopy => Phase::Instant,
    }
}

/// Convert an event into its persisted form. `origin` is the timestamp of
/// the first record of the session.
pub fn log_record(event: &Event, origin: Timestamp) -> LogRecord {
    let mut details = Map::new();
    details.insert("event_id".to_string(), json!(event.event_id));
    details.insert("pid".to_string(), json!(event.process_id));

    match &event.payload {
        EventPayload::None => {}
        EventPayload::Return { retval } => {
            details.insert("retval".to_string(), json!(retval));
        }
        EventPayload::MemoryAlloc { size } => {
            details.insert("size".to_string(), json!(size));
        }
        EventPayload::MemoryCopy { size, direction } => {
            details.insert("size".to_string(), json!(size));
            details.insert("direction".to_string(), json!(direction.as_str()));
        }
        EventPayload::KernelLaunch(dims) => {
            details.insert("grid".to_string(), json!([dims.grid_x, dims.grid_y, dims.grid_z]));
            let block = match dims.block_z {
                Some(z) => json!([dims.block_x, dims.block_y, z]),
                None => json!([dims.block_x, dims.block_y]),
            };
            details.insert("block".to_string(), block);
        }
        EventPayload::Ioctl { ioctl_cmd, retval } => {
            if let Some(cmd) = ioctl_cmd {
                details.insert("ioctl_cmd".to_string(), json!(cmd));
            }
            if let Some(retval) = retval {
                details.insert("retval".to_string(), json!(retval));
            }
        }
    }

    LogRecord {
        ts: relative_secs(event.timestamp, origin),
        name: event.function_name.clone(),
        phase: phase_for(event.kind),
        op_id: Some(OpId::from(event.op_id)),
        tid: Some(u64::from(event.thread_id)),
        depth: event.call_depth,
        details,
    }
}

/// Append-only JSON Lines writer for captured events
pub struct EventLogWriter<W: Write> {
    writer: BufWriter<W>,
    origin: Option<Timestamp>,
    written: u64,
    since_flush: usize,
    flush_every: usize,
}

impl EventLogWriter<File> {
    /// Create (or truncate) the log file at `path`
    pub fn create(path: &Path, flush_every: usize) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log: {}", path.display()))?;
        info!("Writing event log to {}", path.display());
        Ok(Self::new(file, flush_every))
    }
}

impl<W: Write> EventLogWriter<W> {
    pub fn new(writer: W, flush_every: usize) -> Self {
        Self {
            writer: BufWriter::new(writer),
            origin: None,
            written: 0,
            since_flush: 0,
            flush_every: flush_every.max(1),
        }
    }

    pub fn write_event(&mut self, event: &Event) -> Result<()> {
        let origin = *self.origin.get_or_insert(event.timestamp);
        let line = log_record(event, origin)
            .to_line()
            .context("Failed to serialize event")?;

        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        self.since_flush += 1;

        if self.since_flush >= self.flush_every {
            self.flush()?;
        }
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        for event in events {
            self.write_event(event)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush event log")?;
        debug!("Flushed event log at {} records", self.written);
        self.since_flush = 0;
        Ok(())
    }

    /// Final flush; returns the number of records written and the sink
    pub fn finish(mut self) -> Result<(u64, W)> {
        self.flush()?;
        let written = self.written;
        let inner = self
            .writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish event log: {}", e.error()))?;
        Ok((written, inner))
    }
}
