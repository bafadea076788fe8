//! cuscope live tracer
//!
//! Attaches entry and return probes to the GPU driver library, prints live
//! statistics and optionally writes a JSON Lines event log for `cuscope analyze`.

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use cuscope_agent::config::{DEFAULT_MAX_PROBES, DEFAULT_SYMBOL_PREFIX};
use cuscope_agent::Config;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cuscope-agent")]
#[command(about = "eBPF-based GPU driver call tracer", long_about = None)]
#[command(version)]
struct Args {
    /// Process ID to trace (default: all processes)
    #[arg(short, long)]
    pid: Option<i32>,

    /// Event log output (JSON Lines)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also hook the kernel driver's ioctl entry points
    #[arg(long)]
    kernel: bool,

    /// Driver library to probe (skips the library search)
    #[arg(long, env = "CUSCOPE_LIBCUDA")]
    library: Option<PathBuf>,

    /// Only probe exported functions with this prefix
    #[arg(long, default_value = DEFAULT_SYMBOL_PREFIX)]
    prefix: String,

    /// Maximum number of functions to probe
    #[arg(long, default_value_t = DEFAULT_MAX_PROBES)]
    max_probes: usize,

    /// Stop after this long (e.g., "30s", "5m"); runs until Ctrl-C otherwise
    #[arg(short, long)]
    duration: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_tracing(args.verbose);

    info!("Starting cuscope tracer");

    let duration = args
        .duration
        .as_deref()
        .map(|d| cuscope_shared::utils::parse_duration(d).map_err(|e| eyre!("{}", e)))
        .transpose()
        .wrap_err("Failed to parse duration")?;

    let config = Config {
        target_pid: args.pid,
        output_path: args.output,
        kernel_hooks: args.kernel,
        library_path: args.library,
        symbol_prefix: args.prefix,
        max_probes: args.max_probes,
        duration,
        ..Config::default()
    };

    if let Err(e) = cuscope_agent::run_tracer(config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
