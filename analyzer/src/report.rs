//! Text reports: per-category breakdown and longest operations

use crate::category::Category;
use crate::matching::Operation;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

const RULE_WIDTH: usize = 100;

/// Totals for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub count: usize,
    /// Seconds
    pub total: f64,
    pub average: f64,
    /// Share of the grand total, 0 to 100
    pub percent: f64,
}

/// Per-category breakdown, sorted by category name
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorySummary {
    pub rows: Vec<CategoryStats>,
    pub total_count: usize,
    pub total_duration: f64,
}

impl CategorySummary {
    pub fn get(&self, category: Category) -> Option<&CategoryStats> {
        self.rows.iter().find(|row| row.category == category)
    }
}

/// Summarize operations by category
pub fn category_summary(operations: &[Operation]) -> CategorySummary {
    let mut totals: HashMap<Category, (usize, f64)> = HashMap::new();
    for op in operations {
        let entry = totals.entry(op.category).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += op.duration;
    }

    let total_duration: f64 = totals.values().map(|(_, total)| total).sum();
    let mut rows: Vec<CategoryStats> = totals
        .into_iter()
        .map(|(category, (count, total))| CategoryStats {
            category,
            count,
            total,
            average: total / count as f64,
            percent: if total_duration > 0.0 {
                total / total_duration * 100.0
            } else {
                0.0
            },
        })
        .collect();
    rows.sort_by_key(|row| row.category.as_str());

    CategorySummary {
        total_count: operations.len(),
        total_duration,
        rows,
    }
}

/// The `limit` longest operations, longest first. Ties keep log order.
pub fn top_operations(operations: &[Operation], limit: usize) -> Vec<&Operation> {
    let mut sorted: Vec<&Operation> = operations.iter().collect();
    sorted.sort_by(|a, b| b.duration.total_cmp(&a.duration));
    sorted.truncate(limit);
    sorted
}

pub(crate) fn banner(out: &mut impl fmt::Write, title: &str) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "\n{}\n{}\n{}\n", rule, title, rule)
}

/// Run a table writer against a fresh string
pub(crate) fn render_with(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    match write(&mut out) {
        Ok(()) => out,
        Err(fmt::Error) => String::new(),
    }
}

/// Render the category breakdown table
pub fn render_summary(summary: &CategorySummary) -> String {
    render_with(|out| write_summary(out, summary))
}

pub fn write_summary(out: &mut impl fmt::Write, summary: &CategorySummary) -> fmt::Result {
    banner(out, "PIPELINE SUMMARY - Operation Breakdown")?;

    writeln!(
        out,
        "{:<20} {:>10} {:>15} {:>15} {:>12}",
        "Category", "Count", "Total Time", "Avg Time", "% of Total"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for row in &summary.rows {
        writeln!(
            out,
            "{:<20} {:>10} {:>12.3} ms {:>12.3} ms {:>11.1}%",
            row.category.as_str(),
            row.count,
            row.total * 1000.0,
            row.average * 1000.0,
            row.percent
        )?;
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "{:<20} {:>10} {:>12.3} ms",
        "TOTAL",
        summary.total_count,
        summary.total_duration * 1000.0
    )
}

/// Render the longest-operations table
pub fn render_top(operations: &[&Operation], limit: usize) -> String {
    render_with(|out| write_top(out, operations, limit))
}

pub fn write_top(out: &mut impl fmt::Write, operations: &[&Operation], limit: usize) -> fmt::Result {
    banner(out, &format!("TOP {} LONGEST OPERATIONS", limit))?;

    writeln!(out, "{:<4} {:<40} {:>15} {:<15}", "#", "Function", "Duration", "Category")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for (rank, op) in operations.iter().enumerate() {
        writeln!(
            out,
            "{:<4} {:<40} {:>12.3} ms {:<15}",
            rank + 1,
            op.name,
            op.duration * 1000.0,
            op.category.as_str()
        )?;
    }
    Ok(())
}
