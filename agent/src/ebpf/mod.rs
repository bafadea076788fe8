//! eBPF program management

pub mod driver_tracer;
pub mod loader;

pub use driver_tracer::DriverTracer;
