//! Terminal status lines for CLI commands
//!
//! Reports go to stdout; failures go to stderr.

use colored::Colorize;
use std::path::Path;

/// Announce a file the command produced
pub fn written(what: &str, path: &Path) {
    println!("{} {} written to: {}", "✓".green(), what, path.display().to_string().bold());
}

/// Suggest a follow-up step
pub fn hint(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg.dimmed());
}

pub fn warning(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg.red());
}
