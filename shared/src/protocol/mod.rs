//! Binary layouts exchanged with the instrumentation programs

pub mod record;
