//! Begin/end pairing
//!
//! Records are replayed in timestamp order (stable for ties) against a map
//! of pending begins keyed by `op_id`. An end with no pending begin is
//! dropped. A second begin for a key that is still open replaces the first.

use crate::category::Category;
use cuscope_shared::types::log::{LogRecord, OpId, Phase};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A completed call: a begin record paired with its end record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub name: String,
    pub category: Category,
    /// Seconds, on the log's time base
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    /// Nesting depth at the begin record
    pub depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_id: Option<OpId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<u64>,
    /// Begin details, overlaid with the end's
    pub details: Map<String, Value>,
}

impl Operation {
    fn from_pair(begin: &LogRecord, end: &LogRecord) -> Self {
        let mut details = begin.details.clone();
        details.extend(end.details.iter().map(|(k, v)| (k.clone(), v.clone())));

        Self {
            name: end.name.clone(),
            category: Category::classify(&end.name),
            start: begin.ts,
            end: end.ts,
            duration: end.ts - begin.ts,
            depth: begin.depth,
            op_id: end.op_id.clone(),
            tid: end.tid.or(begin.tid),
            details,
        }
    }
}

/// Outcome of a matching pass
#[derive(Debug, Default)]
pub struct Matched {
    /// Completed operations, in the order their end records were seen
    pub operations: Vec<Operation>,
    pub unmatched_ends: usize,
    /// Begins still waiting for an end when the log ran out
    pub open_begins: usize,
}

/// Pair begin and end records into operations
pub fn match_operations(records: &[LogRecord]) -> Matched {
    let mut ordered: Vec<&LogRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.ts.total_cmp(&b.ts));

    let mut pending: HashMap<Option<&OpId>, &LogRecord> = HashMap::new();
    let mut matched = Matched::default();

    for record in ordered {
        match record.phase {
            Phase::Begin => {
                pending.insert(record.op_id.as_ref(), record);
            }
            Phase::End => match pending.remove(&record.op_id.as_ref()) {
                Some(begin) => matched.operations.push(Operation::from_pair(begin, record)),
                None => matched.unmatched_ends += 1,
            },
            Phase::Instant | Phase::Other => {}
        }
    }

    matched.open_begins = pending.len();
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: f64, name: &str, phase: Phase, op_id: i64) -> LogRecord {
        LogRecord {
            ts,
            name: name.to_string(),
            phase,
            op_id: Some(OpId::Int(op_id)),
            tid: Some(1),
            depth: 0,
            details: Map::new(),
        }
    }

    #[test]
    fn test_single_pair() {
        let records = vec![
            record(0.0, "cuInit", Phase::Begin, 1),
            record(0.5, "cuInit", Phase::End, 1),
        ];
        let matched = match_operations(&records);
        assert_eq!(matched.operations.len(), 1);
        assert_eq!(matched.operations[0].duration, 0.5);
        assert_eq!(matched.operations[0].category, Category::Init);
        assert_eq!(matched.unmatched_ends, 0);
        assert_eq!(matched.open_begins, 0);
    }

    #[test]
    fn test_unmatched_end_is_dropped() {
        let records = vec![
            record(0.0, "cuInit", Phase::Begin, 1),
            record(0.2, "cuCtxCreate", Phase::End, 2),
            record(0.5, "cuInit", Phase::End, 1),
        ];
        let matched = match_operations(&records);
        assert_eq!(matched.operations.len(), 1);
        assert_eq!(matched.unmatched_ends, 1);
        assert_eq!(matched.operations[0].name, "cuInit");
    }

    #[test]
    fn test_out_of_order_input_is_sorted() {
        let records = vec![
            record(0.5, "cuInit", Phase::End, 1),
            record(0.0, "cuInit", Phase::Begin, 1),
        ];
        let matched = match_operations(&records);
        assert_eq!(matched.operations.len(), 1);
        assert_eq!(matched.operations[0].start, 0.0);
    }

    #[test]
    fn test_duplicate_begin_overwrites() {
        let records = vec![
            record(0.0, "cuInit", Phase::Begin, 1),
            record(0.1, "cuInit", Phase::Begin, 1),
            record(0.4, "cuInit", Phase::End, 1),
            record(0.6, "cuInit", Phase::End, 1),
        ];
        let matched = match_operations(&records);
        assert_eq!(matched.operations.len(), 1);
        assert_eq!(matched.operations[0].start, 0.1);
        assert_eq!(matched.unmatched_ends, 1);
    }

    #[test]
    fn test_instants_and_open_begins() {
        let mut instant = record(0.05, "cuMemAlloc", Phase::Instant, 1);
        instant.details.insert("size".to_string(), Value::from(64));
        let records = vec![
            record(0.0, "cuMemAlloc", Phase::Begin, 1),
            instant,
            record(0.1, "cuMemAlloc", Phase::End, 1),
            record(0.2, "cuLaunchKernel", Phase::Begin, 2),
        ];
        let matched = match_operations(&records);
        assert_eq!(matched.operations.len(), 1);
        assert_eq!(matched.open_begins, 1);
        assert!(!matched.operations[0].details.contains_key("size"));
    }

    #[test]
    fn test_details_and_depth_come_from_both_sides() {
        let mut begin = record(1.0, "cuMemAlloc_v2", Phase::Begin, 9);
        begin.depth = 2;
        begin.details.insert("event_id".to_string(), Value::from(9));
        let mut end = record(1.25, "cuMemAlloc_v2", Phase::End, 9);
        end.depth = 3;
        end.details.insert("retval".to_string(), Value::from(0));
        end.details.insert("event_id".to_string(), Value::from(12));

        let matched = match_operations(&[begin, end]);
        let op = &matched.operations[0];
        assert_eq!(op.depth, 2);
        assert_eq!(op.details["retval"], 0);
        assert_eq!(op.details["event_id"], 12);
    }

    #[test]
    fn test_missing_op_id_pairs_with_missing_op_id() {
        let mut begin = record(0.0, "cuInit", Phase::Begin, 0);
        begin.op_id = None;
        let mut end = record(0.3, "cuInit", Phase::End, 0);
        end.op_id = None;
        let matched = match_operations(&[begin, end]);
        assert_eq!(matched.operations.len(), 1);
    }
}
