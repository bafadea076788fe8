//! ASCII timeline
//!
//! One lane per call depth. Each operation paints its category symbol over
//! the columns its `[start, end]` interval covers, at least one column wide.

use crate::category::Category;
use crate::matching::Operation;
use crate::report::{banner, render_with};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_WIDTH: usize = 80;
pub const TIME_MARKERS: usize = 10;

/// Painted columns for one call depth
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub depth: u32,
    pub cells: Vec<char>,
}

impl Lane {
    fn new(depth: u32, width: usize) -> Self {
        Self {
            depth,
            cells: vec![' '; width],
        }
    }

    /// Number of columns painted with `symbol`
    pub fn painted(&self, symbol: char) -> usize {
        self.cells.iter().filter(|&&c| c == symbol).count()
    }

    pub fn as_string(&self) -> String {
        self.cells.iter().collect()
    }
}

#[derive(Debug, Clone)]
pub struct Timeline {
    pub width: usize,
    /// Earliest operation start, seconds
    pub origin: f64,
    /// Latest operation end minus `origin`, seconds
    pub total: f64,
    /// Ordered by depth; depths with no operations are absent
    pub lanes: Vec<Lane>,
}

/// Lay out operations on a `width`-column timeline. `None` when there is
/// nothing to draw.
pub fn build_timeline(operations: &[Operation], width: usize) -> Option<Timeline> {
    if operations.is_empty() || width == 0 {
        return None;
    }

    let origin = operations.iter().map(|op| op.start).fold(f64::INFINITY, f64::min);
    let last = operations.iter().map(|op| op.end).fold(f64::NEG_INFINITY, f64::max);
    let total = last - origin;

    let column = |ts: f64| -> usize {
        if total > 0.0 {
            ((ts - origin) / total * width as f64) as usize
        } else {
            0
        }
    };

    let mut ordered: Vec<&Operation> = operations.iter().collect();
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut lanes: BTreeMap<u32, Lane> = BTreeMap::new();
    for op in ordered {
        let lane = lanes.entry(op.depth).or_insert_with(|| Lane::new(op.depth, width));
        let start = column(op.start).min(width - 1);
        let end = column(op.end).max(start + 1).min(width);
        let symbol = op.category.symbol();
        for cell in &mut lane.cells[start..end] {
            *cell = symbol;
        }
    }

    Some(Timeline {
        width,
        origin,
        total,
        lanes: lanes.into_values().collect(),
    })
}

impl Timeline {
    pub fn lane(&self, depth: u32) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.depth == depth)
    }

    /// Axis markers in milliseconds, `TIME_MARKERS + 1` evenly spaced values
    pub fn scale(&self) -> Vec<f64> {
        (0..=TIME_MARKERS)
            .map(|i| self.total * i as f64 / TIME_MARKERS as f64 * 1000.0)
            .collect()
    }

    pub fn render(&self) -> String {
        render_with(|out| self.write_to(out))
    }

    pub fn write_to(&self, out: &mut impl fmt::Write) -> fmt::Result {
        banner(out, "CUDA EXECUTION PIPELINE - ASCII Timeline")?;
        writeln!(out, "Total execution time: {:.3} ms\n", self.total * 1000.0)?;

        writeln!(out, "Legend:")?;
        for category in Category::ALL {
            writeln!(out, "  {} = {}", category.symbol(), category)?;
        }

        for lane in &self.lanes {
            writeln!(out, "\nDepth {}:", lane.depth)?;
            writeln!(out, "  {}", lane.as_string())?;
        }

        writeln!(out, "\n  Time scale (ms):")?;
        let markers: String = self.scale().iter().map(|ms| format!("{:>7.1}", ms)).collect();
        writeln!(out, "  {}", markers)
    }
}
