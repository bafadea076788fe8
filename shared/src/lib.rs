//! Shared types and utilities for cuscope
//!
//! This crate contains the data structures exchanged between the live tracer
//! and the offline analyzer: decoded events, the raw probe record layout, and
//! the persisted event-log schema.

pub mod protocol;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use types::{events::*, log::*};
