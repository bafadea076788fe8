//! Event stream consumer
//!
//! Decodes raw probe records and turns them into [`Event`]s. All per-thread
//! state lives in [`ConsumerState`], which is owned by a single consumer:
//! records from every target thread are funneled through it in delivery
//! order, so no locking is needed.

use super::stats::LiveStats;
use super::symbols::FunctionResolver;
use cuscope_shared::protocol::record::{ProbeCode, RawEventRecord, RecordError};
use cuscope_shared::types::events::{
    CopyDirection, Event, EventId, EventKind, EventPayload, LaunchDims, Tid, Timestamp,
};
use std::collections::HashMap;
use tracing::debug;

/// Open calls tracked per thread. Deeper calls still count towards the
/// depth but get no duration or correlation.
pub const MAX_OPEN_CALLS: usize = 128;

/// Name given to events from the kernel-side ioctl hooks
pub const IOCTL_FUNCTION: &str = "ioctl";

/// Fallback name for copy returns with no recorded entry
const COPY_FUNCTION: &str = "cuMemcpy";

const UNKNOWN_FUNCTION: &str = "unknown";

/// An entry that has not returned yet
#[derive(Debug, Clone)]
struct OpenCall {
    op_id: EventId,
    name: String,
    entered_at: Timestamp,
}

/// Per-thread tracking state
#[derive(Debug, Default)]
pub struct ThreadState {
    depth: u32,
    open_calls: Vec<OpenCall>,
    pending_alloc_size: Option<u64>,
    pending_copy: Option<(u64, CopyDirection)>,
    pending_ioctl: Option<EventId>,
}

impl ThreadState {
    /// Current nesting level
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.len()
    }

    fn innermost(&self) -> Option<&OpenCall> {
        self.open_calls.last()
    }
}

/// State owned by one consumer for the duration of a capture run
#[derive(Debug, Default)]
pub struct ConsumerState {
    threads: HashMap<Tid, ThreadState>,
    next_event_id: EventId,
}

impl ConsumerState {
    fn next_event_id(&mut self) -> EventId {
        let id = self.next_event_id;
        self.next_event_id += 1;
        id
    }

    fn thread_mut(&mut self, tid: Tid) -> &mut ThreadState {
        self.threads.entry(tid).or_default()
    }

    pub fn thread(&self, tid: Tid) -> Option<&ThreadState> {
        self.threads.get(&tid)
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Calls entered but not yet returned, over all threads
    pub fn open_calls(&self) -> usize {
        self.threads.values().map(ThreadState::open_calls).sum()
    }
}

/// Stateful decoder for the raw record stream
pub struct EventConsumer<R> {
    state: ConsumerState,
    resolver: R,
    stats: LiveStats,
    pid_filter: Option<u32>,
}

impl<R: FunctionResolver> EventConsumer<R> {
    pub fn new(resolver: R, progress_every: u64) -> Self {
        Self {
            state: ConsumerState::default(),
            resolver,
            stats: LiveStats::new(progress_every),
            pid_filter: None,
        }
    }

    /// Drop records from other processes. Kernel hooks fire for every
    /// process, so the filter is applied here as well.
    pub fn with_pid_filter(mut self, pid: Option<u32>) -> Self {
        self.pid_filter = pid;
        self
    }

    pub fn stats(&self) -> &LiveStats {
        &self.stats
    }

    pub fn state(&self) -> &ConsumerState {
        &self.state
    }

    /// Decode and process one record straight from the delivery channel.
    /// Undecodable records are counted and yield no events.
    pub fn process_bytes(&mut self, bytes: &[u8]) -> Vec<Event> {
        let result = RawEventRecord::from_bytes(bytes).and_then(|record| self.process(&record));
        self.count_errors(result)
    }

    /// Like [`process`](Self::process), counting a bad probe code instead
    /// of returning it
    pub fn process_lossy(&mut self, record: &RawEventRecord) -> Vec<Event> {
        let result = self.process(record);
        self.count_errors(result)
    }

    fn count_errors(&mut self, result: Result<Vec<Event>, RecordError>) -> Vec<Event> {
        match result {
            Ok(events) => events,
            Err(e) => {
                debug!("Dropping undecodable record: {}", e);
                self.stats.record_decode_error();
                Vec::new()
            }
        }
    }

    /// Process one decoded record, returning the events it produced in
    /// emission order
    pub fn process(&mut self, record: &RawEventRecord) -> Result<Vec<Event>, RecordError> {
        let probe = record.probe_code()?;

        if let Some(pid) = self.pid_filter {
            if record.pid != pid {
                return Ok(Vec::new());
            }
        }

        let mut events = Vec::with_capacity(2);
        match probe {
            ProbeCode::GenericEntry => events.push(self.enter(record, None)),
            ProbeCode::GenericExit => events.push(self.exit(record, None)),

            ProbeCode::AllocEntry => {
                self.state.thread_mut(record.tid).pending_alloc_size = Some(record.arg(1));
                events.push(self.enter(record, Some("cuMemAlloc")));
            }
            ProbeCode::AllocExit => {
                let pending = self.state.thread_mut(record.tid).pending_alloc_size.take();
                if let (Some(size), 0) = (pending, record.retval) {
                    events.push(self.enriched(
                        record,
                        EventKind::MemoryAlloc,
                        "cuMemAlloc",
                        EventPayload::MemoryAlloc { size },
                    ));
                }
                events.push(self.exit(record, Some("cuMemAlloc")));
            }

            ProbeCode::CopyHtoDEntry | ProbeCode::CopyDtoHEntry | ProbeCode::CopyDtoDEntry => {
                let (direction, name) = match probe {
                    ProbeCode::CopyHtoDEntry => (CopyDirection::HostToDevice, "cuMemcpyHtoD"),
                    ProbeCode::CopyDtoHEntry => (CopyDirection::DeviceToHost, "cuMemcpyDtoH"),
                    _ => (CopyDirection::DeviceToDevice, "cuMemcpyDtoD"),
                };
                self.state.thread_mut(record.tid).pending_copy = Some((record.arg(2), direction));
                events.push(self.enter(record, Some(name)));
            }
            ProbeCode::CopyExit => {
                let pending = self.state.thread_mut(record.tid).pending_copy.take();
                if let (Some((size, direction)), 0) = (pending, record.retval) {
                    events.push(self.enriched(
                        record,
                        EventKind::MemoryCopy,
                        COPY_FUNCTION,
                        EventPayload::MemoryCopy { size, direction },
                    ));
                }
                events.push(self.exit(record, Some(COPY_FUNCTION)));
            }

            ProbeCode::LaunchEntry => {
                events.push(self.enter(record, Some("cuLaunchKernel")));
                let dims = LaunchDims {
                    grid_x: record.arg(1) as u32,
                    grid_y: record.arg(2) as u32,
                    grid_z: record.arg(3) as u32,
                    block_x: record.arg(4) as u32,
                    block_y: record.arg(5) as u32,
                    block_z: None,
                };
                events.push(self.enriched(
                    record,
                    EventKind::KernelLaunch,
                    "cuLaunchKernel",
                    EventPayload::KernelLaunch(dims),
                ));
            }

            ProbeCode::IoctlEntry => events.push(self.ioctl_enter(record)),
            ProbeCode::IoctlExit => events.push(self.ioctl_exit(record)),
        }

        for event in &events {
            self.stats.record_event(event);
        }
        Ok(events)
    }

    fn entry_name(&mut self, record: &RawEventRecord, canonical: Option<&str>) -> String {
        if record.ip != 0 {
            if let Some(name) = self.resolver.resolve(record.pid, record.ip) {
                return name;
            }
        }
        match canonical {
            Some(name) => name.to_string(),
            None if record.ip != 0 => format!("{:#x}", record.ip),
            None => UNKNOWN_FUNCTION.to_string(),
        }
    }

    fn enter(&mut self, record: &RawEventRecord, canonical: Option<&str>) -> Event {
        let name = self.entry_name(record, canonical);
        let event_id = self.state.next_event_id();
        let thread = self.state.thread_mut(record.tid);

        thread.depth += 1;
        if thread.open_calls.len() < MAX_OPEN_CALLS {
            thread.open_calls.push(OpenCall {
                op_id: event_id,
                name: name.clone(),
                entered_at: record.timestamp_ns,
            });
        } else {
            debug!("Thread {} exceeded {} open calls", record.tid, MAX_OPEN_CALLS);
        }

        Event {
            timestamp: record.timestamp_ns,
            event_id,
            process_id: record.pid,
            thread_id: record.tid,
            kind: EventKind::CallEnter,
            call_depth: thread.depth,
            function_name: name,
            op_id: event_id,
            payload: EventPayload::None,
        }
    }

    fn exit(&mut self, record: &RawEventRecord, canonical: Option<&str>) -> Event {
        let event_id = self.state.next_event_id();
        let thread = self.state.thread_mut(record.tid);

        // The exit reports the depth its entry was emitted at
        let call_depth = thread.depth;
        let open = if thread.depth > 0 && thread.open_calls.len() == thread.depth as usize {
            thread.open_calls.pop()
        } else {
            None
        };
        thread.depth = thread.depth.saturating_sub(1);

        let (function_name, op_id) = match open {
            Some(call) => {
                let duration = record.timestamp_ns.saturating_sub(call.entered_at);
                self.stats.record_duration(&call.name, duration);
                (call.name, call.op_id)
            }
            None => (canonical.unwrap_or(UNKNOWN_FUNCTION).to_string(), event_id),
        };

        Event {
            timestamp: record.timestamp_ns,
            event_id,
            process_id: record.pid,
            thread_id: record.tid,
            kind: EventKind::CallExit,
            call_depth,
            function_name,
            op_id,
            payload: EventPayload::Return {
                retval: record.retval,
            },
        }
    }

    /// Additional event attached to the innermost open call of the thread
    fn enriched(
        &mut self,
        record: &RawEventRecord,
        kind: EventKind,
        canonical: &str,
        payload: EventPayload,
    ) -> Event {
        let event_id = self.state.next_event_id();
        let thread = self.state.thread_mut(record.tid);
        let (op_id, function_name) = thread
            .innermost()
            .map(|call| (call.op_id, call.name.clone()))
            .unwrap_or_else(|| (event_id, canonical.to_string()));

        Event {
            timestamp: record.timestamp_ns,
            event_id,
            process_id: record.pid,
            thread_id: record.tid,
            kind,
            call_depth: thread.depth,
            function_name,
            op_id,
            payload,
        }
    }

    /// Ioctls are reported one level below the thread's current depth, as
    /// children of the driver call that issued them. The depth itself is
    /// left alone.
    fn ioctl_enter(&mut self, record: &RawEventRecord) -> Event {
        let event_id = self.state.next_event_id();
        let thread = self.state.thread_mut(record.tid);
        thread.pending_ioctl = Some(event_id);

        Event {
            timestamp: record.timestamp_ns,
            event_id,
            process_id: record.pid,
            thread_id: record.tid,
            kind: EventKind::IoctlEnter,
            call_depth: thread.depth + 1,
            function_name: IOCTL_FUNCTION.to_string(),
            op_id: event_id,
            payload: EventPayload::Ioctl {
                ioctl_cmd: Some(record.arg(1)),
                retval: None,
            },
        }
    }

    fn ioctl_exit(&mut self, record: &RawEventRecord) -> Event {
        let event_id = self.state.next_event_id();
        let thread = self.state.thread_mut(record.tid);
        let op_id = thread.pending_ioctl.take().unwrap_or(event_id);

        Event {
            timestamp: record.timestamp_ns,
            event_id,
            process_id: record.pid,
            thread_id: record.tid,
            kind: EventKind::IoctlExit,
            call_depth: thread.depth + 1,
            function_name: IOCTL_FUNCTION.to_string(),
            op_id,
            payload: EventPayload::Ioctl {
                ioctl_cmd: None,
                retval: Some(record.retval),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PID: u32 = 100;

    /// Resolves addresses from a fixed table
    struct TableResolver(HashMap<u64, &'static str>);

    impl FunctionResolver for TableResolver {
        fn resolve(&mut self, _pid: u32, ip: u64) -> Option<String> {
            self.0.get(&ip).map(|name| name.to_string())
        }
    }

    fn consumer() -> EventConsumer<TableResolver> {
        let table = HashMap::from([
            (0x1000, "cuInit"),
            (0x2000, "cuCtxCreate_v2"),
            (0x3000, "cuMemAlloc_v2"),
            (0x4000, "cuLaunchKernel"),
        ]);
        EventConsumer::new(TableResolver(table), 100)
    }

    fn entry(probe: ProbeCode, ts: u64, tid: u32, ip: u64, args: [u64; 6]) -> RawEventRecord {
        RawEventRecord::entry(probe, ts, PID, tid, ip, args)
    }

    fn exit(probe: ProbeCode, ts: u64, tid: u32, retval: i64) -> RawEventRecord {
        RawEventRecord::exit(probe, ts, PID, tid, retval)
    }

    fn run(consumer: &mut EventConsumer<TableResolver>, records: &[RawEventRecord]) -> Vec<Event> {
        records
            .iter()
            .flat_map(|r| consumer.process(r).unwrap())
            .collect()
    }

    #[test]
    fn test_event_ids_strictly_increase() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::GenericEntry, 10, 1, 0x1000, [0; 6]),
                entry(ProbeCode::AllocEntry, 20, 2, 0x3000, [0, 64, 0, 0, 0, 0]),
                exit(ProbeCode::AllocExit, 30, 2, 0),
                entry(ProbeCode::LaunchEntry, 40, 1, 0x4000, [0, 1, 1, 1, 32, 1]),
                exit(ProbeCode::GenericExit, 50, 1, 0),
                exit(ProbeCode::GenericExit, 60, 1, 0),
            ],
        );
        assert_eq!(events.len(), 8);
        assert!(events.windows(2).all(|w| w[0].event_id < w[1].event_id));
        assert_eq!(events[0].event_id, 0);
    }

    #[test]
    fn test_depth_returns_to_zero() {
        let mut c = consumer();
        let mut records = Vec::new();
        for i in 0..5 {
            records.push(entry(ProbeCode::GenericEntry, i, 7, 0x1000, [0; 6]));
        }
        for i in 0..5 {
            records.push(exit(ProbeCode::GenericExit, 10 + i, 7, 0));
        }
        let events = run(&mut c, &records);

        let depths: Vec<u32> = events.iter().map(|e| e.call_depth).collect();
        assert_eq!(depths, vec![1, 2, 3, 4, 5, 5, 4, 3, 2, 1]);
        assert_eq!(c.state().thread(7).unwrap().depth(), 0);
        assert_eq!(c.state().open_calls(), 0);
    }

    #[test]
    fn test_exit_without_entry_floors_depth() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                exit(ProbeCode::GenericExit, 5, 3, 0),
                exit(ProbeCode::GenericExit, 6, 3, 0),
            ],
        );
        assert!(events.iter().all(|e| e.call_depth == 0));
        assert_eq!(events[0].function_name, "unknown");
        // An orphan exit correlates with nothing but itself
        assert_eq!(events[0].op_id, events[0].event_id);
        assert_eq!(c.state().thread(3).unwrap().depth(), 0);
    }

    #[test]
    fn test_exit_reuses_entry_op_id_and_name() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::GenericEntry, 0, 1, 0x2000, [0; 6]),
                exit(ProbeCode::GenericExit, 1_000, 1, 0),
            ],
        );
        assert_eq!(events[1].kind, EventKind::CallExit);
        assert_eq!(events[1].function_name, "cuCtxCreate_v2");
        assert_eq!(events[1].op_id, events[0].event_id);
        assert_eq!(events[1].payload, EventPayload::Return { retval: 0 });
    }

    #[test]
    fn test_successful_alloc_is_enriched() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::AllocEntry, 0, 1, 0x3000, [0xdead, 4096, 0, 0, 0, 0]),
                exit(ProbeCode::AllocExit, 50, 1, 0),
            ],
        );
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::CallEnter, EventKind::MemoryAlloc, EventKind::CallExit]
        );
        assert_eq!(events[1].payload, EventPayload::MemoryAlloc { size: 4096 });
        assert_eq!(events[1].op_id, events[0].event_id);
        assert_eq!(events[1].function_name, "cuMemAlloc_v2");
        assert_eq!(events[2].op_id, events[0].event_id);
    }

    #[test]
    fn test_failed_alloc_clears_pending_size() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::AllocEntry, 0, 1, 0x3000, [0, 4096, 0, 0, 0, 0]),
                exit(ProbeCode::AllocExit, 10, 1, 2),
                exit(ProbeCode::AllocExit, 20, 1, 0),
            ],
        );
        assert!(events.iter().all(|e| e.kind != EventKind::MemoryAlloc));
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].function_name, "cuMemAlloc");
    }

    #[test]
    fn test_copy_is_enriched_with_direction() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::CopyDtoHEntry, 0, 4, 0x9999, [1, 2, 1 << 20, 0, 0, 0]),
                exit(ProbeCode::CopyExit, 10, 4, 0),
            ],
        );
        assert_eq!(events[0].function_name, "cuMemcpyDtoH");
        assert_eq!(
            events[1].payload,
            EventPayload::MemoryCopy {
                size: 1 << 20,
                direction: CopyDirection::DeviceToHost
            }
        );
        assert_eq!(events[2].kind, EventKind::CallExit);
    }

    #[test]
    fn test_failed_copy_clears_pending_copy() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::CopyHtoDEntry, 0, 2, 0x9999, [1, 2, 8192, 0, 0, 0]),
                exit(ProbeCode::CopyExit, 10, 2, 1),
                exit(ProbeCode::CopyExit, 20, 2, 0),
            ],
        );
        assert!(events.iter().all(|e| e.kind != EventKind::MemoryCopy));
        assert_eq!(
            events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![EventKind::CallEnter, EventKind::CallExit, EventKind::CallExit]
        );
        assert!(c.state().thread(2).unwrap().pending_copy.is_none());
        // The second return has no entry left to close
        assert_eq!(events[1].function_name, "cuMemcpyHtoD");
        assert_eq!(events[2].function_name, "cuMemcpy");
        assert_eq!(events[2].op_id, events[2].event_id);
    }

    #[test]
    fn test_launch_emits_geometry_without_block_z() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[entry(ProbeCode::LaunchEntry, 0, 1, 0x4000, [0xf00, 128, 2, 1, 256, 1])],
        );
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::CallEnter);
        assert_eq!(events[1].kind, EventKind::KernelLaunch);
        assert_eq!(events[1].op_id, events[0].event_id);
        assert_eq!(events[1].call_depth, 1);
        match &events[1].payload {
            EventPayload::KernelLaunch(dims) => {
                assert_eq!((dims.grid_x, dims.grid_y, dims.grid_z), (128, 2, 1));
                assert_eq!((dims.block_x, dims.block_y), (256, 1));
                assert_eq!(dims.block_z, None);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_nested_calls_get_their_own_durations() {
        let mut c = consumer();
        run(
            &mut c,
            &[
                entry(ProbeCode::GenericEntry, 0, 1, 0x2000, [0; 6]),
                entry(ProbeCode::GenericEntry, 10, 1, 0x1000, [0; 6]),
                exit(ProbeCode::GenericExit, 30, 1, 0),
                exit(ProbeCode::GenericExit, 100, 1, 0),
            ],
        );
        assert_eq!(c.stats().function("cuInit").unwrap().total_ns, 20);
        assert_eq!(c.stats().function("cuCtxCreate_v2").unwrap().total_ns, 100);
    }

    #[test]
    fn test_threads_are_tracked_independently() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::GenericEntry, 0, 1, 0x1000, [0; 6]),
                entry(ProbeCode::GenericEntry, 1, 2, 0x2000, [0; 6]),
                exit(ProbeCode::GenericExit, 2, 1, 0),
                exit(ProbeCode::GenericExit, 3, 2, 0),
            ],
        );
        assert_eq!(events[2].function_name, "cuInit");
        assert_eq!(events[3].function_name, "cuCtxCreate_v2");
        assert_eq!(c.state().thread_count(), 2);
    }

    #[test]
    fn test_ioctl_nests_below_the_enclosing_call() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::GenericEntry, 0, 1, 0x1000, [0; 6]),
                entry(ProbeCode::IoctlEntry, 1, 1, 0, [3, 0xc0de, 0, 0, 0, 0]),
                exit(ProbeCode::IoctlExit, 2, 1, -22),
                exit(ProbeCode::GenericExit, 3, 1, 0),
            ],
        );
        assert_eq!(events[0].call_depth, 1);
        assert_eq!(events[1].call_depth, 2);
        assert_eq!(events[2].call_depth, 2);
        assert_eq!(
            events[1].payload,
            EventPayload::Ioctl {
                ioctl_cmd: Some(0xc0de),
                retval: None
            }
        );
        assert_eq!(events[2].op_id, events[1].event_id);
        assert_eq!(events[3].function_name, "cuInit");
        assert_eq!(events[3].call_depth, 1);
        assert_eq!(c.state().thread(1).unwrap().depth(), 0);
    }

    #[test]
    fn test_ioctl_outside_any_call() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::IoctlEntry, 1, 1, 0, [3, 0x46, 0, 0, 0, 0]),
                exit(ProbeCode::IoctlExit, 2, 1, 0),
            ],
        );
        assert_eq!(events[0].call_depth, 1);
        assert_eq!(events[1].call_depth, 1);
        assert_eq!(c.state().thread(1).unwrap().depth(), 0);
    }

    #[test]
    fn test_unresolved_entry_falls_back() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::GenericEntry, 0, 1, 0xabc0, [0; 6]),
                entry(ProbeCode::AllocEntry, 1, 1, 0xabd0, [0; 6]),
            ],
        );
        assert_eq!(events[0].function_name, "0xabc0");
        assert_eq!(events[1].function_name, "cuMemAlloc");
    }

    #[test]
    fn test_generic_entry_is_named_by_its_address() {
        let mut c = consumer();
        let events = run(
            &mut c,
            &[
                entry(ProbeCode::GenericEntry, 0, 1, 0x4000, [0; 6]),
                exit(ProbeCode::GenericExit, 1, 1, 0),
                entry(ProbeCode::GenericEntry, 2, 1, 0, [0; 6]),
            ],
        );
        assert_eq!(events[0].function_name, "cuLaunchKernel");
        assert_eq!(events[1].function_name, "cuLaunchKernel");
        assert_eq!(events[2].function_name, "unknown");
    }

    #[test]
    fn test_undecodable_records_are_counted() {
        let mut c = consumer();
        assert!(c.process_bytes(&[0u8; 10]).is_empty());

        let bad = RawEventRecord {
            probe: 42,
            ..Default::default()
        };
        assert!(c.process_bytes(&bad.to_bytes().unwrap()).is_empty());
        assert_eq!(c.stats().decode_errors(), 2);
        assert_eq!(c.stats().total_events(), 0);
    }

    #[test]
    fn test_pid_filter() {
        let mut c = consumer().with_pid_filter(Some(PID + 1));
        let events = run(&mut c, &[entry(ProbeCode::GenericEntry, 0, 1, 0x1000, [0; 6])]);
        assert!(events.is_empty());
        assert_eq!(c.stats().total_events(), 0);
    }
}
