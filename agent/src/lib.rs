//! Live driver-call tracer
//!
//! This library provides the live capture side of cuscope: driver library
//! discovery, probe planning and attachment, event decoding and enrichment,
//! live statistics and the JSON Lines event log.

pub mod attach;
pub mod collector;
pub mod config;
pub mod discovery;
pub mod ebpf;
pub mod error;
pub mod output;
pub mod plan;
pub mod session;

pub use config::Config;
pub use error::TraceError;

use anyhow::{Context, Result};
use collector::{EventConsumer, ProcMapsResolver};
use ebpf::DriverTracer;
use output::EventLogWriter;
use session::TraceSession;
use tracing::{info, warn};

/// Fail unless running with the privileges needed to load probes
pub fn ensure_privileged() -> Result<(), TraceError> {
    if nix::unistd::Uid::effective().is_root() {
        return Ok(());
    }
    let exe = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "cuscope-agent".to_string());
    Err(TraceError::InsufficientPrivilege(exe))
}

/// Run a live trace with the given configuration.
pub async fn run_tracer(config: Config) -> Result<()> {
    config.validate().context("Invalid configuration")?;
    ensure_privileged()?;

    info!("PID filter: {}", config.scope());
    info!(
        "Kernel hooks: {}",
        if config.kernel_hooks { "enabled" } else { "disabled" }
    );

    // 1. Resolve the driver library and plan the probes
    let library = discovery::find_library(config.library_path.as_deref())?;
    let symbols = discovery::exported_functions(&library, &config.symbol_prefix)?;
    info!("Discovered {} driver functions", symbols.len());
    let plan = plan::build_plan(&symbols, config.max_probes);

    // 2. Load and attach
    let mut tracer = DriverTracer::load()?;
    let report = attach::attach_plan(&mut tracer, &plan, &library, config.target_pid);
    if report.is_empty() {
        warn!("No driver functions could be probed; only kernel hooks will report");
    }
    if config.kernel_hooks {
        attach::attach_kernel_hooks(&mut tracer);
    }
    let mut ring_buf = tracer.take_ring_buffer()?;

    // 3. Consume until stopped
    let consumer = EventConsumer::new(ProcMapsResolver::new(&library, &symbols), config.progress_every)
        .with_pid_filter(config.target_pid.map(|pid| pid as u32));
    let writer = config
        .output_path
        .as_deref()
        .map(|path| EventLogWriter::create(path, config.flush_every))
        .transpose()?;
    let mut session = TraceSession::new(consumer, writer);

    info!("Tracing... Press Ctrl-C to stop");
    let reason = session::capture(&mut ring_buf, &mut session, &config).await?;
    info!("Stopping trace ({})", reason);

    drop(ring_buf);
    tracer.stop();

    session.finish(Some(&report))?;
    if let Some(path) = &config.output_path {
        info!("Events saved to: {}", path.display());
    }
    Ok(())
}
