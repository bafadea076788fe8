//! Data model shared by the tracer and the analyzer

pub mod events;
pub mod log;
