//! Analyze command implementation

use crate::output;
use anyhow::{ensure, Context, Result};
use clap::{Args, ValueEnum};
use cuscope_analyzer::export::{folded_lines, write_chrome_trace, write_folded, write_svg};
use cuscope_analyzer::report::{category_summary, render_summary, render_top, top_operations};
use cuscope_analyzer::timeline::{build_timeline, DEFAULT_WIDTH};
use cuscope_analyzer::{analyze_file, Analysis};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Timeline, category summary and longest operations on stdout
    Ascii,
    /// trace.json for chrome://tracing or Perfetto
    Chrome,
    /// flamegraph.txt in folded-stack format
    Flamegraph,
    All,
}

impl OutputFormat {
    fn wants(self, other: OutputFormat) -> bool {
        self == other || self == OutputFormat::All
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Event log written by `cuscope trace --output`
    pub trace_file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ascii)]
    pub format: OutputFormat,

    /// Number of longest operations to list
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Directory for trace.json and flamegraph.txt
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Also render flamegraph.svg
    #[arg(long)]
    pub svg: bool,

    /// Timeline width in columns
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    ensure!(args.width > 0, "--width must be at least 1");

    let analysis = analyze_file(&args.trace_file)
        .with_context(|| format!("Failed to analyze {}", args.trace_file.display()))?;
    println!("{}\n", analysis.stats);
    if analysis.stats.skipped > 0 {
        output::warning(&format!(
            "{} malformed lines were skipped",
            analysis.stats.skipped
        ));
    }

    if args.format.wants(OutputFormat::Ascii) {
        print_reports(&analysis, &args);
    }

    if args.format.wants(OutputFormat::Chrome) {
        let path = args.output_dir.join("trace.json");
        write_chrome_trace(&analysis.operations, &path)?;
        output::written("Chrome trace", &path);
        output::hint("Open in Chrome: chrome://tracing");
    }

    if args.format.wants(OutputFormat::Flamegraph) {
        let path = args.output_dir.join("flamegraph.txt");
        write_folded(&analysis.operations, &path)?;
        output::written("Flamegraph data", &path);

        if !args.svg {
            output::hint(&format!(
                "Generate SVG with: inferno-flamegraph {} > flamegraph.svg",
                path.display()
            ));
        } else {
            let svg = args.output_dir.join("flamegraph.svg");
            if write_svg(&folded_lines(&analysis.operations), &svg)? {
                output::written("Flamegraph SVG", &svg);
            } else {
                output::warning("No operation lasted a microsecond; skipping flamegraph.svg");
            }
        }
    }

    Ok(())
}

fn print_reports(analysis: &Analysis, args: &AnalyzeArgs) {
    let operations = &analysis.operations;

    match build_timeline(operations, args.width) {
        Some(timeline) => print!("{}", timeline.render()),
        None => println!("No timeline data available"),
    }
    print!("{}", render_summary(&category_summary(operations)));
    print!("{}", render_top(&top_operations(operations, args.top), args.top));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_includes_every_format() {
        for format in [OutputFormat::Ascii, OutputFormat::Chrome, OutputFormat::Flamegraph] {
            assert!(OutputFormat::All.wants(format));
            assert!(format.wants(format));
        }
        assert!(!OutputFormat::Ascii.wants(OutputFormat::Chrome));
    }

    #[test]
    fn test_run_writes_requested_exports() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("events.jsonl");
        std::fs::write(
            &log,
            concat!(
                r#"{"ts":0.0,"name":"cuInit","phase":"B","op_id":1}"#,
                "\n",
                r#"{"ts":0.002,"name":"cuInit","phase":"E","op_id":1}"#,
                "\n"
            ),
        )
        .unwrap();

        let args = AnalyzeArgs {
            trace_file: log,
            format: OutputFormat::All,
            top: 5,
            output_dir: dir.path().to_path_buf(),
            svg: true,
            width: DEFAULT_WIDTH,
            verbose: false,
        };
        run(args).unwrap();

        assert!(dir.path().join("trace.json").exists());
        assert!(dir.path().join("flamegraph.svg").exists());
        let folded = std::fs::read_to_string(dir.path().join("flamegraph.txt")).unwrap();
        assert!(folded.starts_with("CUDA;cuInit "));
    }

    #[test]
    fn test_run_skips_svg_for_sub_microsecond_operations() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("events.jsonl");
        std::fs::write(
            &log,
            concat!(
                r#"{"ts":0.0,"name":"cuCtxGetCurrent","phase":"B","op_id":1}"#,
                "\n",
                r#"{"ts":0.0000004,"name":"cuCtxGetCurrent","phase":"E","op_id":1}"#,
                "\n"
            ),
        )
        .unwrap();

        let args = AnalyzeArgs {
            trace_file: log,
            format: OutputFormat::Flamegraph,
            top: 5,
            output_dir: dir.path().to_path_buf(),
            svg: true,
            width: DEFAULT_WIDTH,
            verbose: false,
        };
        run(args).unwrap();

        let folded = std::fs::read_to_string(dir.path().join("flamegraph.txt")).unwrap();
        assert_eq!(folded, "CUDA;cuCtxGetCurrent 0\n");
        assert!(!dir.path().join("flamegraph.svg").exists());
    }

    #[test]
    fn test_run_rejects_zero_width() {
        let args = AnalyzeArgs {
            trace_file: PathBuf::from("unused.jsonl"),
            format: OutputFormat::Ascii,
            top: 1,
            output_dir: PathBuf::from("."),
            svg: false,
            width: 0,
            verbose: false,
        };
        assert!(run(args).is_err());
    }
}
