//! Live aggregator
//!
//! Running counters updated for every emitted event.

use cuscope_shared::types::events::{Event, EventKind};
use cuscope_shared::utils::time::nanos_to_millis;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::info;

/// Per-function call statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionStats {
    pub count: u64,
    pub total_ns: u64,
}

impl FunctionStats {
    pub fn average_ns(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.total_ns / self.count
        }
    }
}

/// Live statistics for one capture run
#[derive(Debug)]
pub struct LiveStats {
    total_events: u64,
    by_kind: BTreeMap<EventKind, u64>,
    functions: HashMap<String, FunctionStats>,
    decode_errors: u64,
    progress_every: u64,
}

impl LiveStats {
    pub fn new(progress_every: u64) -> Self {
        Self {
            total_events: 0,
            by_kind: BTreeMap::new(),
            functions: HashMap::new(),
            decode_errors: 0,
            progress_every: progress_every.max(1),
        }
    }

    /// Count an emitted event. Logs a progress line on every
    /// `progress_every`-th event and returns whether it did.
    pub fn record_event(&mut self, event: &Event) -> bool {
        self.total_events += 1;
        *self.by_kind.entry(event.kind).or_insert(0) += 1;

        if self.total_events % self.progress_every == 0 {
            info!("Captured {} events...", self.total_events);
            return true;
        }
        false
    }

    /// Fold a completed call duration into the per-function totals
    pub fn record_duration(&mut self, function: &str, duration_ns: u64) {
        let stats = self.functions.entry(function.to_string()).or_default();
        stats.count += 1;
        stats.total_ns += duration_ns;
    }

    pub fn record_decode_error(&mut self) {
        self.decode_errors += 1;
    }

    pub fn total_events(&self) -> u64 {
        self.total_events
    }

    pub fn count(&self, kind: EventKind) -> u64 {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn decode_errors(&self) -> u64 {
        self.decode_errors
    }

    pub fn function(&self, name: &str) -> Option<FunctionStats> {
        self.functions.get(name).copied()
    }

    /// Functions with the highest cumulative duration
    pub fn top_functions(&self, limit: usize) -> Vec<(&str, FunctionStats)> {
        let mut functions: Vec<_> = self
            .functions
            .iter()
            .map(|(name, stats)| (name.as_str(), *stats))
            .collect();
        functions.sort_by(|a, b| b.1.total_ns.cmp(&a.1.total_ns).then(a.0.cmp(b.0)));
        functions.truncate(limit);
        functions
    }

    /// Multi-line summary for the end of a run
    pub fn summary(&self, elapsed_secs: f64) -> String {
        let mut out = String::new();
        match self.write_summary(&mut out, elapsed_secs) {
            Ok(()) => out,
            Err(fmt::Error) => String::new(),
        }
    }

    pub fn write_summary(&self, out: &mut impl fmt::Write, elapsed_secs: f64) -> fmt::Result {
        writeln!(out, "=== TRACE SUMMARY ===")?;
        writeln!(out, "Total events captured: {}", self.total_events)?;
        writeln!(out, "Duration: {:.2} seconds", elapsed_secs)?;

        for kind in EventKind::ALL {
            let count = self.count(kind);
            if count > 0 {
                writeln!(out, "  {:<14} {:>10}", kind.as_str(), count)?;
            }
        }

        if self.decode_errors > 0 {
            writeln!(out, "Undecodable records: {}", self.decode_errors)?;
        }

        let top = self.top_functions(10);
        if !top.is_empty() {
            writeln!(out, "\nSlowest functions (cumulative):")?;
            writeln!(out, "  {:<32} {:>8} {:>12} {:>12}", "Function", "Calls", "Total (ms)", "Avg (us)")?;
            for (name, stats) in top {
                writeln!(
                    out,
                    "  {:<32} {:>8} {:>12.3} {:>12.3}",
                    name,
                    stats.count,
                    nanos_to_millis(stats.total_ns),
                    stats.average_ns() as f64 / 1e3
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuscope_shared::types::events::EventPayload;

    fn event(kind: EventKind) -> Event {
        Event {
            timestamp: 0,
            event_id: 0,
            process_id: 1,
            thread_id: 1,
            kind,
            call_depth: 0,
            function_name: "cuInit".to_string(),
            op_id: 0,
            payload: EventPayload::None,
        }
    }

    #[test]
    fn test_counts_by_kind() {
        let mut stats = LiveStats::new(100);
        stats.record_event(&event(EventKind::CallEnter));
        stats.record_event(&event(EventKind::CallExit));
        stats.record_event(&event(EventKind::CallEnter));

        assert_eq!(stats.total_events(), 3);
        assert_eq!(stats.count(EventKind::CallEnter), 2);
        assert_eq!(stats.count(EventKind::MemoryCopy), 0);
    }

    #[test]
    fn test_progress_every_nth_event() {
        let mut stats = LiveStats::new(100);
        let progress: Vec<bool> = (0..250)
            .map(|_| stats.record_event(&event(EventKind::CallEnter)))
            .collect();
        assert_eq!(progress.iter().filter(|p| **p).count(), 2);
        assert!(progress[99]);
        assert!(progress[199]);
    }

    #[test]
    fn test_top_functions_by_total_duration() {
        let mut stats = LiveStats::new(100);
        stats.record_duration("cuInit", 5_000);
        stats.record_duration("cuMemAlloc", 2_000);
        stats.record_duration("cuMemAlloc", 4_000);

        let top = stats.top_functions(1);
        assert_eq!(top[0].0, "cuMemAlloc");
        assert_eq!(top[0].1.count, 2);
        assert_eq!(top[0].1.average_ns(), 3_000);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let mut stats = LiveStats::new(100);
        stats.record_event(&event(EventKind::KernelLaunch));
        stats.record_decode_error();
        stats.record_duration("cuLaunchKernel", 1_500_000);

        let summary = stats.summary(1.0);
        assert!(summary.contains("Total events captured: 1"));
        assert!(summary.contains("kernel_launch"));
        assert!(summary.contains("Undecodable records: 1"));
        assert!(summary.contains("cuLaunchKernel"));
    }

    /// Accepts a fixed number of writes, then refuses
    struct Budget(usize);

    impl fmt::Write for Budget {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            self.0 = self.0.checked_sub(1).ok_or(fmt::Error)?;
            Ok(())
        }
    }

    #[test]
    fn test_write_summary_stops_on_writer_error() {
        let mut stats = LiveStats::new(100);
        stats.record_event(&event(EventKind::KernelLaunch));

        assert!(stats.write_summary(&mut Budget(0), 1.0).is_err());
        assert!(stats.write_summary(&mut Budget(2), 1.0).is_err());
        assert!(stats.write_summary(&mut Budget(usize::MAX), 1.0).is_ok());
    }
}
