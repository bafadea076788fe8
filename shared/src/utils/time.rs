//! Time-related utilities

pub const NANOS_PER_SEC: f64 = 1_000_000_000.0;
pub const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Seconds elapsed from `origin_ns` to `timestamp_ns`.
///
/// Negative when the timestamp precedes the origin, which happens when
/// records from different CPUs are delivered slightly out of order.
pub fn relative_secs(timestamp_ns: u64, origin_ns: u64) -> f64 {
    (timestamp_ns as i128 - origin_ns as i128) as f64 / NANOS_PER_SEC
}

/// Convert seconds to microseconds
pub fn secs_to_micros(secs: f64) -> f64 {
    secs * MICROS_PER_SEC
}

/// Convert a nanosecond duration to milliseconds
pub fn nanos_to_millis(nanos: u64) -> f64 {
    nanos as f64 / 1_000_000.0
}
