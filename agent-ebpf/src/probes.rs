#![no_std]
#![no_main]

use aya_ebpf::{
    helpers::{bpf_get_current_pid_tgid, bpf_ktime_get_ns},
    macros::{kprobe, kretprobe, map, uprobe, uretprobe},
    maps::RingBuf,
    programs::{ProbeContext, RetProbeContext},
};

mod record;
use record::*;

#[cfg(not(any(bpf_target_arch = "x86_64", bpf_target_arch = "aarch64")))]
compile_error!("unsupported bpf_target_arch: probes are built for x86_64 or aarch64 hosts");

/// Delivery channel to userspace. Records are dropped when it is full.
#[map]
static EVENTS: RingBuf = RingBuf::with_byte_size(1024 * 1024, 0);

#[inline(always)]
fn instruction_pointer(ctx: &ProbeContext) -> u64 {
    #[cfg(bpf_target_arch = "x86_64")]
    {
        unsafe { (*ctx.regs).rip }
    }
    #[cfg(bpf_target_arch = "aarch64")]
    {
        unsafe { (*ctx.regs).pc }
    }
}

#[inline(always)]
fn submit_entry(ctx: &ProbeContext, probe: u32) -> u32 {
    let pid_tgid = bpf_get_current_pid_tgid();
    let mut args = [0u64; CAPTURED_ARGS];
    let mut i = 0;
    while i < CAPTURED_ARGS {
        args[i] = ctx.arg(i).unwrap_or(0);
        i += 1;
    }

    let record = RawEventRecord {
        timestamp_ns: unsafe { bpf_ktime_get_ns() },
        pid: (pid_tgid >> 32) as u32,
        tid: pid_tgid as u32,
        probe,
        reserved: 0,
        ip: instruction_pointer(ctx),
        args,
        retval: 0,
    };
    let _ = EVENTS.output(&record, 0);
    0
}

#[inline(always)]
fn submit_exit(ctx: &RetProbeContext, probe: u32) -> u32 {
    let pid_tgid = bpf_get_current_pid_tgid();
    let record = RawEventRecord {
        timestamp_ns: unsafe { bpf_ktime_get_ns() },
        pid: (pid_tgid >> 32) as u32,
        tid: pid_tgid as u32,
        probe,
        reserved: 0,
        ip: 0,
        args: [0; CAPTURED_ARGS],
        retval: ctx.ret().unwrap_or(0),
    };
    let _ = EVENTS.output(&record, 0);
    0
}

#[uprobe]
pub fn generic_entry(ctx: ProbeContext) -> u32 {
    submit_entry(&ctx, GENERIC_ENTRY)
}

#[uretprobe]
pub fn generic_exit(ctx: RetProbeContext) -> u32 {
    submit_exit(&ctx, GENERIC_EXIT)
}

#[uprobe]
pub fn alloc_entry(ctx: ProbeContext) -> u32 {
    submit_entry(&ctx, ALLOC_ENTRY)
}

#[uretprobe]
pub fn alloc_exit(ctx: RetProbeContext) -> u32 {
    submit_exit(&ctx, ALLOC_EXIT)
}

#[uprobe]
pub fn copy_htod_entry(ctx: ProbeContext) -> u32 {
    submit_entry(&ctx, COPY_HTOD_ENTRY)
}

#[uprobe]
pub fn copy_dtoh_entry(ctx: ProbeContext) -> u32 {
    submit_entry(&ctx, COPY_DTOH_ENTRY)
}

#[uprobe]
pub fn copy_dtod_entry(ctx: ProbeContext) -> u32 {
    submit_entry(&ctx, COPY_DTOD_ENTRY)
}

#[uretprobe]
pub fn copy_exit(ctx: RetProbeContext) -> u32 {
    submit_exit(&ctx, COPY_EXIT)
}

#[uprobe]
pub fn launch_entry(ctx: ProbeContext) -> u32 {
    submit_entry(&ctx, LAUNCH_ENTRY)
}

#[kprobe]
pub fn ioctl_entry(ctx: ProbeContext) -> u32 {
    submit_entry(&ctx, IOCTL_ENTRY)
}

#[kretprobe]
pub fn ioctl_exit(ctx: RetProbeContext) -> u32 {
    submit_exit(&ctx, IOCTL_EXIT)
}

#[cfg(not(test))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    unsafe { core::hint::unreachable_unchecked() }
}
