//! Persisted output of a capture run

pub mod event_log;

pub use event_log::EventLogWriter;
