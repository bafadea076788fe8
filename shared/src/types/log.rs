//! Persisted event-log schema
//!
//! The log is append-only JSON Lines, one record per emitted event:
//!
//! ```text
//! {"ts":0.000124,"name":"cuMemAlloc_v2","phase":"B","op_id":7,"tid":4411,"depth":1,"details":{}}
//! ```
//!
//! Readers must tolerate records from other producers, so every field falls
//! back to a default when absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Record phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Span begin
    #[default]
    #[serde(rename = "B")]
    Begin,
    /// Span end
    #[serde(rename = "E")]
    End,
    /// Point-in-time enrichment record
    #[serde(rename = "I")]
    Instant,
    /// Anything else a foreign producer wrote
    #[serde(other)]
    Other,
}

/// Correlation key as written by producers: either an integer or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpId {
    Int(i64),
    Text(String),
}

impl From<u64> for OpId {
    fn from(id: u64) -> Self {
        match i64::try_from(id) {
            Ok(v) => OpId::Int(v),
            Err(_) => OpId::Text(id.to_string()),
        }
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpId::Int(v) => write!(f, "{}", v),
            OpId::Text(s) => f.write_str(s),
        }
    }
}

fn default_name() -> String {
    "unknown".to_string()
}

/// One line of the persisted event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Seconds, relative to the start of the capture session
    #[serde(default)]
    pub ts: f64,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub phase: Phase,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_id: Option<OpId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tid: Option<u64>,

    #[serde(default)]
    pub depth: u32,

    #[serde(default)]
    pub details: Map<String, Value>,
}

impl LogRecord {
    /// Parse a single log line
    pub fn from_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// Serialize as a single log line (no trailing newline)
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
