// Copyright 2025 benchdiff Contributors
// SPDX-License-Identifier: Apache-2.0

//! Table reflow.
//!
//! Rewrites a comparison report so that every row of the fenced table gets
//! a percentage diff and trend glyph in one vertical column. The diff column
//! starts at `max_row_width - offset_margin`, where the row width is measured
//! after stripping worker suffixes and the `Benchmark` marker.
//!
//! Reflow runs in two passes over the text:
//!
//! 1. the width pass measures every row inside the fence;
//! 2. the emission pass indents the table, rebuilds the column header and
//!    appends the diff column.
//!
//! Lines outside the fence are copied unchanged. The transformation is not
//! idempotent: reflowing an already reflowed report indents it again and
//! appends a second diff column.

pub mod lexer;
pub mod line;

use crate::error::Result;
use crate::format::{display_width, pad_to};
use crate::markdown::DIVIDER;
use line::{classify_line, is_fence, LineKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static WORKER_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S)-\d+(\s|$)").expect("valid worker suffix regex"));

static NAME_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)Benchmark").expect("valid name marker regex"));

// `~ (p=1.000 n=1) ²` or `+4.20% (p=0.002 n=6)`
static COMPARISON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+(?:~|[+-]?\d+(?:\.\d+)?%)\s+\([^)]*\)(?:\s*[⁰¹²³⁴⁵⁶⁷⁸⁹]+)?\s*$")
        .expect("valid comparison regex")
});

static TRAILING_DIFF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+diff$").expect("valid diff label regex"));

/// Header phrase that earns the `Diff` label.
const DIFF_PHRASE: &str = "vs base";

/// Options controlling the reflowed layout.
#[derive(Debug, Clone)]
pub struct ReflowOptions {
    /// Prefix added to every line inside the table.
    pub indent: String,
    /// Distance between the widest row's end and the diff column start.
    pub offset_margin: usize,
    /// Percent change beyond which a row counts as slower or faster.
    pub threshold: f64,
    /// Glyph for regressions.
    pub slower: String,
    /// Glyph for improvements.
    pub faster: String,
    /// Glyph for changes within the threshold.
    pub neutral: String,
}

impl Default for ReflowOptions {
    fn default() -> Self {
        Self {
            indent: " ".repeat(8),
            offset_margin: 13,
            threshold: 10.0,
            slower: "🐌".to_string(),
            faster: "🚀".to_string(),
            neutral: "➡️".to_string(),
        }
    }
}

/// Direction of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Candidate is slower than base.
    Slower,
    /// Candidate is faster than base.
    Faster,
    /// Within the threshold.
    Neutral,
}

impl Trend {
    /// Classify a percent change.
    ///
    /// The comparison uses the value rounded to two decimals, the same
    /// precision the report prints, so `+10.00%` is never "slower".
    pub fn from_diff(diff: f64, threshold: f64) -> Self {
        let shown = (diff * 100.0).round() / 100.0;
        if shown > threshold {
            Trend::Slower
        } else if shown < -threshold {
            Trend::Faster
        } else {
            Trend::Neutral
        }
    }

    fn glyph(self, opts: &ReflowOptions) -> &str {
        match self {
            Trend::Slower => &opts.slower,
            Trend::Faster => &opts.faster,
            Trend::Neutral => &opts.neutral,
        }
    }
}

/// Percent change from `base` to `candidate`, `None` when base is zero.
pub fn percent_diff(base: f64, candidate: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    Some((candidate - base) / base * 100.0)
}

/// Remove the worker suffix and the leading `Benchmark` marker of a row.
pub fn strip_row(line: &str) -> String {
    let without_suffix = WORKER_SUFFIX.replace(line, "$1$2");
    NAME_MARKER.replace(&without_suffix, "$1").into_owned()
}

/// Display width of a row as used by the width pass.
pub fn row_width(line: &str) -> usize {
    display_width(strip_row(line).trim())
}

/// Column at which the diff column starts for the rows of `text`.
///
/// Only rows inside fenced regions are measured.
pub fn diff_offset(text: &str, opts: &ReflowOptions) -> usize {
    let mut inside = false;
    let mut max_width = 0;
    for line in text.lines() {
        if is_fence(line) {
            inside = !inside;
            continue;
        }
        if inside && classify_line(line).is_row() {
            max_width = max_width.max(row_width(line));
        }
    }
    max_width.saturating_sub(opts.offset_margin)
}

fn place_at(left: &str, column: usize, cell: &str) -> String {
    let mut out = if display_width(left) < column {
        pad_to(left, column)
    } else {
        format!("{left}  ")
    };
    out.push_str(cell);
    out
}

fn rebuild_header(line: &str, offset: usize) -> String {
    // Trailing dividers and `Diff` labels may alternate, e.g. `│   Diff`.
    let mut left = line.trim_end();
    loop {
        let trimmed = left.trim_end_matches(DIVIDER).trim_end();
        let trimmed = match TRAILING_DIFF.find(trimmed) {
            Some(m) => trimmed[..m.start()].trim_end(),
            None => trimmed,
        };
        if trimmed.len() == left.len() {
            break;
        }
        left = trimmed;
    }

    let label = if line.contains(DIFF_PHRASE) { "Diff" } else { "" };
    place_at(left, offset, &format!("{label}{DIVIDER}"))
}

fn rebuild_row(line: &str, offset: usize, opts: &ReflowOptions) -> Result<String> {
    let stripped = strip_row(line);
    let left = COMPARISON
        .replace(stripped.trim_end(), "")
        .trim_end()
        .to_string();

    let values = lexer::extract_magnitudes(&left, 2)?;
    let diff = match values.as_slice() {
        [base, candidate] => percent_diff(*base, *candidate),
        _ => None,
    };
    let Some(diff) = diff else {
        return Ok(stripped);
    };

    let trend = Trend::from_diff(diff, opts.threshold);
    debug!(row = left.split_whitespace().next().unwrap_or(""), diff, ?trend, "Row compared");
    Ok(place_at(&left, offset, &format!("{:+.2}% {}", diff, trend.glyph(opts))))
}

/// Reflow every fenced table in `text`.
///
/// Fails on a numeric token with an unknown unit; nothing is produced in
/// that case.
pub fn reflow(text: &str, opts: &ReflowOptions) -> Result<String> {
    let offset = diff_offset(text, opts);
    debug!(offset, "Computed diff column offset");

    let mut out = Vec::new();
    let mut inside = false;
    for line in text.lines() {
        if is_fence(line) {
            inside = !inside;
            out.push(line.to_string());
            continue;
        }
        if !inside {
            out.push(line.to_string());
            continue;
        }

        let body = match classify_line(line) {
            LineKind::Footnote | LineKind::Blank | LineKind::Metadata | LineKind::Fence => {
                line.to_string()
            }
            LineKind::ColumnHeader => rebuild_header(line, offset),
            LineKind::Data | LineKind::Geomean => rebuild_row(line, offset, opts)?,
        };
        out.push(format!("{}{}", opts.indent, body));
    }

    let mut result = out.join("\n");
    if text.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}
