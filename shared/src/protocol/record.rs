//! Raw probe record layout.
//!
//! Every probe hit delivers one fixed-size record through the ring buffer.
//! The layout must match `agent-ebpf/src/probes.rs` byte for byte:
//!
//! | offset | field          | type     |
//! |--------|----------------|----------|
//! | 0      | `timestamp_ns` | u64      |
//! | 8      | `pid`          | u32      |
//! | 12     | `tid`          | u32      |
//! | 16     | `probe`        | u32      |
//! | 20     | reserved       | u32      |
//! | 24     | `ip`           | u64      |
//! | 32     | `args`         | [u64; 6] |
//! | 80     | `retval`       | i64      |
//!
//! Decoding goes through bincode with fixint encoding so the byte layout is
//! identical to the `#[repr(C)]` struct without reading through raw pointers.

use bincode::Options;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size of one encoded record in bytes
pub const RECORD_SIZE: usize = 88;

/// Number of captured integer arguments
pub const CAPTURED_ARGS: usize = 6;

/// Errors produced while decoding a raw record
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("record too short: {0} bytes (expected {RECORD_SIZE})")]
    Truncated(usize),

    #[error("unknown probe code {0}")]
    UnknownProbe(u32),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}

/// Which handler produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeCode {
    GenericEntry = 1,
    GenericExit = 2,
    AllocEntry = 3,
    AllocExit = 4,
    CopyHtoDEntry = 5,
    CopyDtoHEntry = 6,
    CopyDtoDEntry = 7,
    CopyExit = 8,
    LaunchEntry = 9,
    IoctlEntry = 10,
    IoctlExit = 11,
}

impl TryFrom<u32> for ProbeCode {
    type Error = RecordError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => ProbeCode::GenericEntry,
            2 => ProbeCode::GenericExit,
            3 => ProbeCode::AllocEntry,
            4 => ProbeCode::AllocExit,
            5 => ProbeCode::CopyHtoDEntry,
            6 => ProbeCode::CopyDtoHEntry,
            7 => ProbeCode::CopyDtoDEntry,
            8 => ProbeCode::CopyExit,
            9 => ProbeCode::LaunchEntry,
            10 => ProbeCode::IoctlEntry,
            11 => ProbeCode::IoctlExit,
            other => return Err(RecordError::UnknownProbe(other)),
        })
    }
}

/// One raw probe hit, as written by the instrumentation programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct RawEventRecord {
    pub timestamp_ns: u64,
    pub pid: u32,
    pub tid: u32,
    pub probe: u32,
    pub reserved: u32,
    /// Probed address on entry, zero on return
    pub ip: u64,
    /// First six integer arguments on entry, zero on return
    pub args: [u64; CAPTURED_ARGS],
    /// Return value on return, zero on entry
    pub retval: i64,
}

fn record_bincode() -> impl bincode::config::Options {
    bincode::config::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .allow_trailing_bytes()
}

impl RawEventRecord {
    /// Build an entry record
    pub fn entry(probe: ProbeCode, timestamp_ns: u64, pid: u32, tid: u32, ip: u64, args: [u64; CAPTURED_ARGS]) -> Self {
        Self {
            timestamp_ns,
            pid,
            tid,
            probe: probe as u32,
            reserved: 0,
            ip,
            args,
            retval: 0,
        }
    }

    /// Build a return record
    pub fn exit(probe: ProbeCode, timestamp_ns: u64, pid: u32, tid: u32, retval: i64) -> Self {
        Self {
            timestamp_ns,
            pid,
            tid,
            probe: probe as u32,
            reserved: 0,
            ip: 0,
            args: [0; CAPTURED_ARGS],
            retval,
        }
    }

    /// Decode a record from ring-buffer bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.len() < RECORD_SIZE {
            return Err(RecordError::Truncated(bytes.len()));
        }
        Ok(record_bincode().deserialize(&bytes[..RECORD_SIZE])?)
    }

    /// Encode a record into its wire layout
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        Ok(record_bincode().serialize(self)?)
    }

    /// Typed probe code
    pub fn probe_code(&self) -> Result<ProbeCode, RecordError> {
        ProbeCode::try_from(self.probe)
    }

    /// Captured argument by zero-based position
    pub fn arg(&self, index: usize) -> u64 {
        self.args.get(index).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_size_matches_c_layout() {
        let record = RawEventRecord::default();
        assert_eq!(record.to_bytes().unwrap().len(), RECORD_SIZE);
        assert_eq!(std::mem::size_of::<RawEventRecord>(), RECORD_SIZE);
    }

    #[test]
    fn test_field_offsets() {
        let record = RawEventRecord::entry(
            ProbeCode::AllocEntry,
            0x1122334455667788,
            0xaabbccdd,
            7,
            0x7f00_0000_1000,
            [1, 4096, 0, 0, 0, 0],
        );
        let bytes = record.to_bytes().unwrap();

        assert_eq!(bytes[0..8], 0x1122334455667788u64.to_le_bytes());
        assert_eq!(bytes[8..12], 0xaabbccddu32.to_le_bytes());
        assert_eq!(bytes[16..20], [3, 0, 0, 0]);
        assert_eq!(bytes[24..32], 0x7f00_0000_1000u64.to_le_bytes());
        assert_eq!(bytes[40..48], 4096u64.to_le_bytes());
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let err = RawEventRecord::from_bytes(&[0u8; 40]).unwrap_err();
        assert!(matches!(err, RecordError::Truncated(40)));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let record = RawEventRecord::exit(ProbeCode::GenericExit, 5, 1, 2, -3);
        let mut bytes = record.to_bytes().unwrap();
        bytes.extend_from_slice(&[0xff; 8]);
        assert_eq!(RawEventRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_unknown_probe_code() {
        let record = RawEventRecord {
            probe: 99,
            ..Default::default()
        };
        assert!(matches!(record.probe_code(), Err(RecordError::UnknownProbe(99))));
    }
}
