//! Raw record written for every probe hit
//!
//! Layout must match `cuscope_shared::protocol::record::RawEventRecord`.

/// Number of captured integer arguments
pub const CAPTURED_ARGS: usize = 6;

pub const GENERIC_ENTRY: u32 = 1;
pub const GENERIC_EXIT: u32 = 2;
pub const ALLOC_ENTRY: u32 = 3;
pub const ALLOC_EXIT: u32 = 4;
pub const COPY_HTOD_ENTRY: u32 = 5;
pub const COPY_DTOH_ENTRY: u32 = 6;
pub const COPY_DTOD_ENTRY: u32 = 7;
pub const COPY_EXIT: u32 = 8;
pub const LAUNCH_ENTRY: u32 = 9;
pub const IOCTL_ENTRY: u32 = 10;
pub const IOCTL_EXIT: u32 = 11;

#[repr(C)]
pub struct RawEventRecord {
    pub timestamp_ns: u64,
    pub pid: u32,
    pub tid: u32,
    pub probe: u32,
    pub reserved: u32,
    pub ip: u64,
    pub args: [u64; CAPTURED_ARGS],
    pub retval: i64,
}
