//! Event collection and decoding

pub mod consumer;
pub mod stats;
pub mod symbols;

pub use consumer::{ConsumerState, EventConsumer, ThreadState};
pub use stats::{FunctionStats, LiveStats};
pub use symbols::{FunctionResolver, ProcMapsResolver};
