//! Event type definitions for captured driver calls
//!
//! These types represent the decoded events emitted by the live tracer after
//! per-thread enrichment. An event is immutable once emitted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in nanoseconds from the monotonic clock
pub type Timestamp = u64;

/// Process ID
pub type Pid = u32;

/// Thread ID
pub type Tid = u32;

/// Process-wide event sequence number
pub type EventId = u64;

/// Kind of a captured event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    CallEnter,
    CallExit,
    KernelLaunch,
    MemoryAlloc,
    MemoryCopy,
    IoctlEnter,
    IoctlExit,
}

impl EventKind {
    /// All kinds, in declaration order
    pub const ALL: [EventKind; 7] = [
        EventKind::CallEnter,
        EventKind::CallExit,
        EventKind::KernelLaunch,
        EventKind::MemoryAlloc,
        EventKind::MemoryCopy,
        EventKind::IoctlEnter,
        EventKind::IoctlExit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::CallEnter => "call_enter",
            EventKind::CallExit => "call_exit",
            EventKind::KernelLaunch => "kernel_launch",
            EventKind::MemoryAlloc => "memory_alloc",
            EventKind::MemoryCopy => "memory_copy",
            EventKind::IoctlEnter => "ioctl_enter",
            EventKind::IoctlExit => "ioctl_exit",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a memory copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CopyDirection {
    #[serde(rename = "H2D")]
    HostToDevice,
    #[serde(rename = "D2H")]
    DeviceToHost,
    #[serde(rename = "D2D")]
    DeviceToDevice,
}

impl CopyDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyDirection::HostToDevice => "H2D",
            CopyDirection::DeviceToHost => "D2H",
            CopyDirection::DeviceToDevice => "D2D",
        }
    }
}

impl fmt::Display for CopyDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Launch geometry captured from a kernel launch.
///
/// `block_z` is passed as the seventh argument of the launch call and lies
/// outside the captured register arguments, so it is never available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchDims {
    pub grid_x: u32,
    pub grid_y: u32,
    pub grid_z: u32,
    pub block_x: u32,
    pub block_y: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_z: Option<u32>,
}

/// Kind-specific event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// Plain call entry, nothing captured
    None,
    /// Generic return value
    Return { retval: i64 },
    MemoryAlloc { size: u64 },
    MemoryCopy { size: u64, direction: CopyDirection },
    KernelLaunch(LaunchDims),
    Ioctl { ioctl_cmd: Option<u64>, retval: Option<i64> },
}

/// A decoded, enriched event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic timestamp of the underlying probe hit
    pub timestamp: Timestamp,

    /// Strictly increasing within one capture run
    pub event_id: EventId,

    pub process_id: Pid,
    pub thread_id: Tid,
    pub kind: EventKind,

    /// Per-thread nesting level at emission time
    pub call_depth: u32,

    pub function_name: String,

    /// Correlation key linking a call's entry, exit and enrichment events
    pub op_id: EventId,

    pub payload: EventPayload,
}
