// Copyright 2025 benchdiff Contributors
// SPDX-License-Identifier: Apache-2.0

//! Classification of report lines inside the fenced table region.

use super::lexer::SUPERSCRIPTS;
use crate::markdown::{DIVIDER, FENCE, GEOMEAN_LABEL};
use once_cell::sync::Lazy;
use regex::Regex;

/// Environment labels printed above the table.
pub const METADATA_PREFIXES: &[&str] = &["goos:", "goarch:", "pkg:", "cpu:"];

/// Phrases that identify the column header carrying the comparison legend.
pub const HEADER_PHRASES: &[&str] = &["vs base", "old", "new"];

// Anchored at the start so data rows mentioning sample counts stay data rows.
static SAMPLES_FOOTNOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^need\s*(?:>=|≥)\s*\d+\s+samples").expect("valid footnote regex")
});

/// Role of a line in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Code fence delimiter.
    Fence,
    /// Legend line below the table.
    Footnote,
    /// Empty or whitespace-only line.
    Blank,
    /// Environment line such as `goos: linux`.
    Metadata,
    /// Column header carrying the `vs base` legend.
    ColumnHeader,
    /// Geometric mean summary row.
    Geomean,
    /// Benchmark row or any other table content.
    Data,
}

impl LineKind {
    /// Whether the line takes part in the width pass and gets a diff.
    pub fn is_row(self) -> bool {
        matches!(self, LineKind::Data | LineKind::Geomean)
    }
}

/// Whether `line` opens or closes the table region.
pub fn is_fence(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

/// Classify a line found inside the table region.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.starts_with(FENCE) {
        return LineKind::Fence;
    }
    if trimmed.starts_with(SUPERSCRIPTS) || SAMPLES_FOOTNOTE.is_match(trimmed) {
        return LineKind::Footnote;
    }
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if METADATA_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return LineKind::Metadata;
    }
    if trimmed.contains(DIVIDER) && HEADER_PHRASES.iter().any(|p| trimmed.contains(p)) {
        return LineKind::ColumnHeader;
    }
    if trimmed.split_whitespace().next() == Some(GEOMEAN_LABEL) {
        return LineKind::Geomean;
    }
    LineKind::Data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footnotes() {
        assert_eq!(
            classify_line("¹ need >= 6 samples for confidence interval at level 0.95"),
            LineKind::Footnote
        );
        assert_eq!(classify_line("  ⁴ summaries must be >0 to compute geomean"), LineKind::Footnote);
        assert_eq!(
            classify_line("need >= 4 samples to detect a difference"),
            LineKind::Footnote
        );
    }

    #[test]
    fn test_sample_phrase_mid_line_stays_data() {
        assert_eq!(
            classify_line("Decode   1.00n   2.00n   need >= 4 samples"),
            LineKind::Data
        );
    }

    #[test]
    fn test_metadata_and_blank() {
        assert_eq!(classify_line("goos: linux"), LineKind::Metadata);
        assert_eq!(classify_line("cpu: GitHub Actions Runner"), LineKind::Metadata);
        assert_eq!(classify_line("cpu: Example CPU @ 3.00GHz"), LineKind::Metadata);
        assert_eq!(classify_line("   "), LineKind::Blank);
        assert_eq!(classify_line(""), LineKind::Blank);
    }

    #[test]
    fn test_column_header_needs_divider_and_phrase() {
        assert_eq!(
            classify_line("        │ sec/op   │ sec/op  vs base   │"),
            LineKind::ColumnHeader
        );
        assert_eq!(classify_line("        │ old.txt │ new.txt │"), LineKind::ColumnHeader);
        assert_eq!(classify_line("        │ base   │ pr   │"), LineKind::Data);
        assert_eq!(classify_line("Renew   1.00n   2.00n"), LineKind::Data);
    }

    #[test]
    fn test_rows() {
        assert_eq!(classify_line("geomean   1.00n   2.00n"), LineKind::Geomean);
        assert_eq!(classify_line("geomeanish   1.00n"), LineKind::Data);
        assert!(LineKind::Geomean.is_row());
        assert!(!LineKind::Footnote.is_row());
        assert!(is_fence("  ```text"));
        assert!(!is_fence("``"));
    }
}
