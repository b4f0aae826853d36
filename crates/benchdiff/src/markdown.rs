// Copyright 2025 benchdiff Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown comparison report generation.
//!
//! The comparator renders a base run and a candidate run side by side inside
//! a fenced code block. The layout is deliberately loose (a fixed 52-column
//! name field); [`crate::reflow`] tightens it afterwards and adds the real
//! diff column.
//!
//! ````text
//! Comparison:
//! ```
//! goos: linux
//! goarch: x86_64
//! pkg: benchdiff
//! cpu: Example CPU
//!                                                     │ base                │           pr                            │
//!                                                     │       sec/op        │    sec/op      vs base                │   Diff
//! Decode                                              100.00n ± ∞ ¹         200.00n ± ∞ ¹         ~ (p=1.000 n=1) ²
//! geomean                                             100.00n               200.00n
//! ¹ need >= 6 samples for confidence interval at level 0.95
//! ...
//! ```
//! ````

use crate::format::{display_width, format_ns, pad_to};
use crate::probe;
use crate::result::{BenchDocument, BenchMap};
use std::collections::BTreeSet;
use tracing::debug;

/// Title printed above the fenced table.
pub const TITLE: &str = "Comparison:";

/// Code fence delimiting the table region.
pub const FENCE: &str = "```";

/// Column divider glyph.
pub const DIVIDER: char = '│';

/// Placeholder interval appended to every present value.
pub const CONFIDENCE_PLACEHOLDER: &str = "± ∞ ¹";

/// Placeholder comparison appended when both sides are present.
pub const COMPARISON_PLACEHOLDER: &str = "~ (p=1.000 n=1) ²";

/// Marker for a value missing from one run.
pub const MISSING: &str = "N/A";

/// Label of the summary row.
pub const GEOMEAN_LABEL: &str = "geomean";

/// Legend printed after the table.
pub const FOOTNOTES: [&str; 4] = [
    "¹ need >= 6 samples for confidence interval at level 0.95",
    "² all samples are equal",
    "³ need >= 4 samples to detect a difference at alpha level 0.05",
    "⁴ summaries must be >0 to compute geomean",
];

const VALUE_CELL_WIDTH: usize = 22;
const ZONE_WIDTH: usize = 19;
const ZONE_GAP: &str = "           ";
const SUB_HEADER: &str = "│       sec/op        │    sec/op      vs base                │   Diff";

/// Options controlling the comparison layout.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Width of the name column.
    pub name_width: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { name_width: 52 }
    }
}

/// Environment lines printed above the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader {
    /// Operating system family.
    pub goos: String,
    /// CPU architecture.
    pub goarch: String,
    /// Package the benchmarks belong to.
    pub pkg: String,
    /// CPU model.
    pub cpu: String,
}

impl ReportHeader {
    /// Describe the current host, probing for the CPU model.
    pub fn detect(pkg: impl Into<String>) -> Self {
        Self {
            goos: std::env::consts::OS.to_string(),
            goarch: std::env::consts::ARCH.to_string(),
            pkg: pkg.into(),
            cpu: probe::detect_cpu(),
        }
    }

    fn lines(&self) -> [String; 4] {
        [
            format!("goos: {}", self.goos),
            format!("goarch: {}", self.goarch),
            format!("pkg: {}", self.pkg),
            format!("cpu: {}", self.cpu),
        ]
    }
}

/// Geometric mean of the strictly positive values, if any.
pub fn geomean<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .filter(|v| **v > 0.0)
        .fold((0.0_f64, 0_usize), |(sum, n), v| (sum + v.ln(), n + 1));
    if count == 0 {
        return None;
    }
    Some((sum / count as f64).exp())
}

// A zero value renders like a missing one.
fn value_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{} {}", format_ns(v), CONFIDENCE_PLACEHOLDER),
        _ => MISSING.to_string(),
    }
}

fn row(name: &str, base: &str, pr: &str, annotation: Option<&str>, opts: &CompareOptions) -> String {
    let mut line = pad_to(name, opts.name_width);
    // Overlong names still need a separator from the base value.
    if display_width(name) >= opts.name_width {
        line.push(' ');
    }
    line.push_str(&pad_to(base, VALUE_CELL_WIDTH));
    line.push_str(&pad_to(pr, VALUE_CELL_WIDTH));
    if let Some(annotation) = annotation {
        line.push_str(annotation);
    }
    line.trim_end().to_string()
}

fn column_headers(opts: &CompareOptions) -> [String; 2] {
    let blank = pad_to("", opts.name_width);
    [
        format!(
            "{blank}{DIVIDER} {} {DIVIDER}{ZONE_GAP}{}{ZONE_GAP}{DIVIDER}",
            pad_to("base", ZONE_WIDTH),
            pad_to("pr", ZONE_WIDTH)
        ),
        format!("{blank}{SUB_HEADER}"),
    ]
}

/// Render the comparison of two runs as report lines, fences included.
pub fn comparison_lines(
    base: &BenchMap,
    pr: &BenchMap,
    header: &ReportHeader,
    opts: &CompareOptions,
) -> Vec<String> {
    let names: BTreeSet<&String> = base.keys().chain(pr.keys()).collect();
    debug!(
        base = base.len(),
        pr = pr.len(),
        rows = names.len(),
        "Rendering comparison table"
    );

    let mut lines = Vec::with_capacity(names.len() + 16);
    lines.push(TITLE.to_string());
    lines.push(FENCE.to_string());
    lines.extend(header.lines());
    lines.extend(column_headers(opts));

    for name in names {
        let b = base.get(name).copied();
        let p = pr.get(name).copied();
        let annotation = match (b, p) {
            (Some(b), Some(p)) if b > 0.0 && p > 0.0 => Some(COMPARISON_PLACEHOLDER),
            _ => None,
        };
        lines.push(row(name, &value_cell(b), &value_cell(p), annotation, opts));
    }

    if let (Some(gb), Some(gp)) = (geomean(base.values()), geomean(pr.values())) {
        lines.push(row(GEOMEAN_LABEL, &format_ns(gb), &format_ns(gp), None, opts));
    }

    lines.extend(FOOTNOTES.iter().map(|f| f.to_string()));
    lines.push(FENCE.to_string());
    lines
}

/// Render the comparison of two canonical documents as a Markdown string.
pub fn generate_comparison(
    base: &BenchDocument,
    pr: &BenchDocument,
    header: &ReportHeader,
    opts: &CompareOptions,
) -> String {
    let mut output = comparison_lines(&base.bench_map(), &pr.bench_map(), header, opts).join("\n");
    output.push('\n');
    output
}
