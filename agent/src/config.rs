//! Configuration types for the live tracer

use std::path::PathBuf;
use std::time::Duration;

/// Default name prefix of the driver API entry points
pub const DEFAULT_SYMBOL_PREFIX: &str = "cu";

/// Default cap on the number of functions probed, bounding live overhead
pub const DEFAULT_MAX_PROBES: usize = 100;

/// Tracer configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Target process ID (None = trace all processes)
    pub target_pid: Option<i32>,

    /// Optional event log path (JSON Lines)
    pub output_path: Option<PathBuf>,

    /// Also hook the kernel-side driver ioctl entry points
    pub kernel_hooks: bool,

    /// Explicit driver library path, bypassing the search order
    pub library_path: Option<PathBuf>,

    /// Only exported symbols with this prefix are probed
    pub symbol_prefix: String,

    /// Maximum number of functions to probe
    pub max_probes: usize,

    /// Stop after this long (None = run until interrupted)
    pub duration: Option<Duration>,

    /// Force a log flush after this many written records
    pub flush_every: usize,

    /// Print a progress line after this many events
    pub progress_every: u64,

    /// Maximum raw records drained from the ring buffer per wakeup
    pub batch_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_pid: None,
            output_path: None,
            kernel_hooks: false,
            library_path: std::env::var_os("CUSCOPE_LIBCUDA").map(PathBuf::from),
            symbol_prefix: DEFAULT_SYMBOL_PREFIX.to_string(),
            max_probes: DEFAULT_MAX_PROBES,
            duration: None,
            flush_every: 256,
            progress_every: 100,
            batch_capacity: 4096,
        }
    }
}

impl Config {
    /// Human readable description of the trace scope
    pub fn scope(&self) -> String {
        self.target_pid
            .map(|p| format!("PID {}", p))
            .unwrap_or_else(|| "all processes".to_string())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(pid) = self.target_pid {
            if pid <= 0 {
                anyhow::bail!("Target PID must be positive (got {})", pid);
            }
        }

        if self.max_probes == 0 {
            anyhow::bail!("Probe limit must be greater than 0");
        }

        if self.symbol_prefix.is_empty() {
            anyhow::bail!("Symbol prefix must not be empty");
        }

        if self.flush_every == 0 {
            anyhow::bail!("Flush interval must be greater than 0");
        }

        if self.progress_every == 0 {
            anyhow::bail!("Progress interval must be greater than 0");
        }

        if self.batch_capacity == 0 {
            anyhow::bail!("Batch capacity must be greater than 0");
        }

        if let Some(duration) = self.duration {
            if duration.is_zero() {
                anyhow::bail!("Duration must be greater than 0");
            }
        }

        Ok(())
    }
}
