//! Trace command implementation

use anyhow::{Context, Result};
use clap::Args;
use cuscope_agent::config::{DEFAULT_MAX_PROBES, DEFAULT_SYMBOL_PREFIX};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Process ID to trace (default: all processes)
    #[arg(short, long)]
    pub pid: Option<i32>,

    /// Write the event log (JSON Lines) here
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also hook the kernel driver's ioctl entry points
    #[arg(long)]
    pub kernel: bool,

    /// Driver library to probe
    #[arg(long, env = "CUSCOPE_LIBCUDA")]
    pub library: Option<PathBuf>,

    /// Only probe exported functions with this prefix
    #[arg(long, default_value = DEFAULT_SYMBOL_PREFIX)]
    pub prefix: String,

    /// Maximum number of functions to probe
    #[arg(long, default_value_t = DEFAULT_MAX_PROBES)]
    pub max_probes: usize,

    /// Stop after this long (e.g., "30s", "5m")
    #[arg(short, long)]
    pub duration: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub async fn run(args: TraceArgs) -> Result<()> {
    let duration = args
        .duration
        .as_deref()
        .map(cuscope_shared::utils::parse_duration)
        .transpose()
        .context("Failed to parse duration")?;

    let config = cuscope_agent::Config {
        target_pid: args.pid,
        output_path: args.output,
        kernel_hooks: args.kernel,
        library_path: args.library,
        symbol_prefix: args.prefix,
        max_probes: args.max_probes,
        duration,
        ..cuscope_agent::Config::default()
    };

    cuscope_agent::run_tracer(config).await
}
