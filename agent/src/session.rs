//! Capture session
//!
//! Drives records from a [`RecordSource`] through the consumer, the live
//! statistics and the event log. The same session processes live ring-buffer
//! records and replayed fixtures.

use crate::attach::AttachReport;
use crate::collector::{EventConsumer, FunctionResolver};
use crate::config::Config;
use crate::output::EventLogWriter;
use anyhow::Result;
use aya::maps::{MapData, RingBuf};
use cuscope_shared::protocol::record::RawEventRecord;
use cuscope_shared::types::events::Event;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Idle wait between drains of an empty delivery channel
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Ordered supply of raw records
pub trait RecordSource {
    /// Hand up to `max` delivered records to `sink` in delivery order.
    /// Returns how many were drained.
    fn drain(&mut self, max: usize, sink: &mut dyn FnMut(&[u8]) -> Result<()>) -> Result<usize>;
}

impl RecordSource for RingBuf<MapData> {
    fn drain(&mut self, max: usize, sink: &mut dyn FnMut(&[u8]) -> Result<()>) -> Result<usize> {
        let mut drained = 0;
        while drained < max {
            let Some(item) = self.next() else { break };
            sink(&*item)?;
            drained += 1;
        }
        Ok(drained)
    }
}

/// Why a capture loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Interrupted,
    DurationElapsed,
    TargetExited,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Interrupted => "interrupted",
            StopReason::DurationElapsed => "duration elapsed",
            StopReason::TargetExited => "target process exited",
        })
    }
}

/// Final numbers of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub total_events: u64,
    pub records_written: u64,
    pub decode_errors: u64,
    pub open_calls: usize,
}

/// One capture run
pub struct TraceSession<R, W: Write> {
    consumer: EventConsumer<R>,
    writer: Option<EventLogWriter<W>>,
    started: std::time::Instant,
}

impl<R: FunctionResolver, W: Write> TraceSession<R, W> {
    pub fn new(consumer: EventConsumer<R>, writer: Option<EventLogWriter<W>>) -> Self {
        Self {
            consumer,
            writer,
            started: std::time::Instant::now(),
        }
    }

    pub fn consumer(&self) -> &EventConsumer<R> {
        &self.consumer
    }

    /// Process one record as delivered by the probes
    pub fn process_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        let events = self.consumer.process_bytes(bytes);
        self.persist(&events)?;
        Ok(events.len())
    }

    /// Process one decoded record
    pub fn process_record(&mut self, record: &RawEventRecord) -> Result<usize> {
        let events = self.consumer.process_lossy(record);
        self.persist(&events)?;
        Ok(events.len())
    }

    /// Process an ordered sequence of records; returns the events emitted
    pub fn replay<I>(&mut self, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = RawEventRecord>,
    {
        let mut emitted = 0u64;
        for record in records {
            emitted += self.process_record(&record)? as u64;
        }
        Ok(emitted)
    }

    fn persist(&mut self, events: &[Event]) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(events)?;
        }
        Ok(())
    }

    /// End the run: print the summary and flush the log. Consumes the
    /// session, so both happen exactly once.
    pub fn finish(self, attach: Option<&AttachReport>) -> Result<(SessionSummary, Option<W>)> {
        let stats = self.consumer.stats();
        let mut report = stats.summary(self.started.elapsed().as_secs_f64());

        if let Some(attach) = attach {
            report.push_str(&format!(
                "\nProbes attached: {} (skipped: {})\n",
                attach.attached_count(),
                attach.skipped.len()
            ));
        }
        let open_calls = self.consumer.state().open_calls();
        if open_calls > 0 {
            report.push_str(&format!("Calls still open at stop: {}\n", open_calls));
        }
        println!("\n{}", report);

        let (records_written, sink) = match self.writer {
            Some(writer) => {
                let (written, sink) = writer.finish()?;
                info!("Event log flushed ({} records)", written);
                (written, Some(sink))
            }
            None => (0, None),
        };

        let summary = SessionSummary {
            total_events: stats.total_events(),
            records_written,
            decode_errors: stats.decode_errors(),
            open_calls,
        };
        Ok((summary, sink))
    }
}

/// Drain `source` into `session` until interrupted, the configured duration
/// elapses or the target process exits.
///
/// Each wakeup processes at most `batch_capacity` records synchronously.
/// Records still undelivered when the loop stops are lost.
pub async fn capture<S, R, W>(
    source: &mut S,
    session: &mut TraceSession<R, W>,
    config: &Config,
) -> Result<StopReason>
where
    S: RecordSource,
    R: FunctionResolver,
    W: Write,
{
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let deadline = config.duration.map(|d| Instant::now() + d);
    let proc_path = config.target_pid.map(|pid| PathBuf::from(format!("/proc/{}", pid)));

    loop {
        let drained = source.drain(config.batch_capacity, &mut |bytes: &[u8]| {
            session.process_bytes(bytes).map(|_| ())
        })?;
        if drained > 0 {
            debug!("Processed batch of {} records", drained);
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(StopReason::DurationElapsed);
        }

        if proc_path.as_ref().is_some_and(|p| !p.exists()) {
            // Pick up the returns the target delivered before exiting
            source.drain(config.batch_capacity, &mut |bytes: &[u8]| {
                session.process_bytes(bytes).map(|_| ())
            })?;
            return Ok(StopReason::TargetExited);
        }

        let wait = if drained == config.batch_capacity {
            Duration::ZERO
        } else {
            POLL_INTERVAL
        };

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = &mut ctrl_c => return Ok(StopReason::Interrupted),
        }
    }
}
