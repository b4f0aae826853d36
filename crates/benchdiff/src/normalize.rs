// Copyright 2025 benchdiff Contributors
// SPDX-License-Identifier: Apache-2.0

//! Conversion of raw harness records into canonical benchmark documents.

use crate::result::{
    BenchDocument, CanonicalBench, CommitInfo, RawResult, CANONICAL_UNIT, OPS_PER_SECOND,
};
use chrono::Utc;
use tracing::{debug, warn};

/// Marker word stripped from the front of benchmark names.
pub const NAME_MARKER: &str = "Benchmark";

/// Default tool tag recorded in normalized documents.
pub const DEFAULT_TOOL: &str = "node";

/// Strip the leading [`NAME_MARKER`] from a benchmark name.
pub fn normalize_name(name: &str) -> &str {
    name.strip_prefix(NAME_MARKER).unwrap_or(name)
}

/// Convert a throughput score to nanoseconds per operation.
///
/// Returns `None` for scores that are not strictly positive or not in
/// operations per second.
pub fn to_nanos_per_op(score: f64, unit: &str) -> Option<f64> {
    if unit != OPS_PER_SECOND || score <= 0.0 || !score.is_finite() {
        return None;
    }
    let ns = (1.0 / score) * 1e9;
    Some((ns * 100.0).round() / 100.0)
}

/// Convert one raw record, or `None` if it must be dropped.
pub fn canonicalize(raw: &RawResult) -> Option<CanonicalBench> {
    let metric = &raw.primary_metric;
    let Some(value) = to_nanos_per_op(metric.score, &metric.score_unit) else {
        warn!(
            benchmark = %raw.benchmark,
            score = metric.score,
            unit = %metric.score_unit,
            "Dropping benchmark with unsupported score"
        );
        return None;
    };
    // Rounding can push very large scores down to zero.
    if value <= 0.0 {
        warn!(benchmark = %raw.benchmark, score = metric.score, "Dropping benchmark rounded to zero");
        return None;
    }

    Some(CanonicalBench {
        name: normalize_name(&raw.benchmark).to_string(),
        value,
        unit: CANONICAL_UNIT.to_string(),
        extra: String::new(),
    })
}

/// Inputs of a normalization run besides the raw records.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    /// Commit metadata.
    pub commit: CommitInfo,
    /// Harness tag.
    pub tool: String,
    /// Available parallelism.
    pub procs: usize,
    /// Unix epoch milliseconds.
    pub date: i64,
}

impl NormalizeContext {
    /// Collect the context from the running process.
    pub fn from_process() -> Self {
        Self {
            commit: CommitInfo::from_env(),
            tool: DEFAULT_TOOL.to_string(),
            procs: available_procs(),
            date: Utc::now().timestamp_millis(),
        }
    }

    /// Override the tool tag.
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }
}

/// Best-effort host parallelism, 1 when unknown.
pub fn available_procs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Build a canonical document from raw records.
pub fn normalize(raw: &[RawResult], ctx: NormalizeContext) -> BenchDocument {
    let benches: Vec<CanonicalBench> = raw.iter().filter_map(canonicalize).collect();
    debug!(
        input = raw.len(),
        kept = benches.len(),
        "Normalized raw benchmark results"
    );

    BenchDocument {
        commit: ctx.commit,
        date: ctx.date,
        tool: ctx.tool,
        procs: ctx.procs,
        benches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::PrimaryMetric;

    fn raw(name: &str, score: f64, unit: &str) -> RawResult {
        RawResult {
            benchmark: name.to_string(),
            primary_metric: PrimaryMetric {
                score,
                score_unit: unit.to_string(),
            },
        }
    }

    fn ctx() -> NormalizeContext {
        NormalizeContext {
            commit: CommitInfo::default(),
            tool: DEFAULT_TOOL.to_string(),
            procs: 4,
            date: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_normalize_name_strips_marker_only() {
        assert_eq!(normalize_name("BenchmarkDecode"), "Decode");
        assert_eq!(normalize_name("benchmarkDecode"), "benchmarkDecode");
        assert_eq!(normalize_name("Decode"), "Decode");
        assert_eq!(normalize_name("DecodeBenchmark"), "DecodeBenchmark");
    }

    #[test]
    fn test_to_nanos_per_op_rounds_to_two_decimals() {
        for score in [1.0, 3.0, 7.5, 1234.5678, 1e6, 0.37] {
            let ns = to_nanos_per_op(score, "ops/s").unwrap();
            let expected = ((1.0 / score) * 1e9 * 100.0).round() / 100.0;
            assert_eq!(ns, expected);
            assert!((ns - (1.0 / score) * 1e9).abs() <= 0.005 + f64::EPSILON * ns);
        }
        assert_eq!(to_nanos_per_op(3.0, "ops/s"), Some(333_333_333.33));
    }

    #[test]
    fn test_non_positive_and_foreign_units_are_dropped() {
        assert_eq!(to_nanos_per_op(0.0, "ops/s"), None);
        assert_eq!(to_nanos_per_op(-2.0, "ops/s"), None);
        assert_eq!(to_nanos_per_op(f64::NAN, "ops/s"), None);
        assert_eq!(to_nanos_per_op(2.0, "ms/op"), None);
        assert_eq!(to_nanos_per_op(2.0, "ops/ms"), None);
    }

    #[test]
    fn test_normalize_keeps_only_valid_records() {
        let records = vec![
            raw("BenchmarkA", 1000.0, "ops/s"),
            raw("BenchmarkB", 0.0, "ops/s"),
            raw("BenchmarkC", 50.0, "us/op"),
            raw("D", 4.0, "ops/s"),
        ];
        let doc = normalize(&records, ctx());
        let names: Vec<_> = doc.benches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["A", "D"]);
        assert_eq!(doc.benches[0].value, 1_000_000.0);
        assert_eq!(doc.benches[0].unit, "ns/op");
        assert_eq!(doc.benches[0].extra, "");
        assert_eq!(doc.benches[1].value, 250_000_000.0);
        assert_eq!(doc.procs, 4);
        assert_eq!(doc.tool, "node");
    }

    #[test]
    fn test_huge_scores_rounding_to_zero_are_dropped() {
        assert!(canonicalize(&raw("Fast", 1e12, "ops/s")).is_none());
    }

    #[test]
    fn test_normalized_document_shape() {
        let doc = normalize(&[raw("BenchmarkA", 2.0, "ops/s")], ctx().with_tool("go"));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["date"], 1_700_000_000_000i64);
        assert_eq!(json["tool"], "go");
        assert_eq!(json["procs"], 4);
        assert_eq!(json["commit"]["author"]["email"], "");
        assert_eq!(json["benches"][0]["name"], "A");
        assert_eq!(json["benches"][0]["value"], 500_000_000.0);
        assert_eq!(json["benches"][0]["unit"], "ns/op");
        assert_eq!(json["benches"][0]["extra"], "");
        assert_eq!(json["commit"]["distinct"], false);
    }

    #[test]
    fn test_record_defaults_are_dropped() {
        let records = vec![
            raw("BenchmarkKept", 10.0, "ops/s"),
            RawResult {
                benchmark: "BenchmarkSkipped".into(),
                ..Default::default()
            },
        ];
        let doc = normalize(&records, ctx());
        assert_eq!(doc.benches.len(), 1);
        assert_eq!(doc.benches[0].name, "Kept");
    }
}
