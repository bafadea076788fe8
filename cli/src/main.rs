//! CLI for cuscope
//!
//! Commands:
//! - trace: capture driver calls live (wraps the agent)
//! - analyze: report on a captured event log

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "cuscope")]
#[command(about = "cuscope - eBPF-based GPU driver call tracer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace driver calls of a process (or every process) live
    Trace(commands::trace::TraceArgs),

    /// Analyze a captured event log
    Analyze(commands::analyze::AnalyzeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Trace(args) => {
            init_tracing(args.verbose);
            commands::trace::run(args).await
        }
        Commands::Analyze(args) => {
            init_tracing(args.verbose);
            commands::analyze::run(args)
        }
    };

    if let Err(e) = result {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

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
