//! Offline pipeline analyzer
//!
//! Reads a cuscope event log, pairs begin/end records into operations and
//! produces reports (category summary, longest operations, ASCII timeline)
//! and exports (trace-viewer JSON, folded stacks, flamegraph SVG).

pub mod analysis;
pub mod category;
pub mod error;
pub mod export;
pub mod log;
pub mod matching;
pub mod report;
pub mod timeline;

pub use analysis::{analyze_file, analyze_records, Analysis, LoadStats};
pub use category::Category;
pub use error::AnalyzeError;
pub use matching::{match_operations, Operation};
