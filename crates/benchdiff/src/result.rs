// Copyright 2025 benchdiff Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark result types.
//!
//! This module provides the raw harness records, the canonical benchmark
//! document produced by the normalizer and the per-run maps consumed by the
//! comparator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unit attached to every canonical record.
pub const CANONICAL_UNIT: &str = "ns/op";

/// Only throughput scores in this unit are accepted by the normalizer.
pub const OPS_PER_SECOND: &str = "ops/s";

/// Primary metric of a raw harness record.
///
/// Missing fields default to a zero score and an empty unit, which the
/// normalizer drops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrimaryMetric {
    /// Measured score.
    pub score: f64,
    /// Unit of `score`, e.g. `ops/s`.
    pub score_unit: String,
}

/// A single record as emitted by the external benchmark harness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawResult {
    /// Fully qualified benchmark name.
    pub benchmark: String,
    /// Primary metric reported for the benchmark.
    pub primary_metric: PrimaryMetric,
}

/// Canonical benchmark record.
///
/// `value` is always strictly positive and expressed in nanoseconds per
/// operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalBench {
    /// Benchmark name with the `Benchmark` marker removed.
    pub name: String,
    /// Nanoseconds per operation.
    pub value: f64,
    /// Always [`CANONICAL_UNIT`].
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Free-form metadata, empty for normalized records.
    #[serde(default)]
    pub extra: String,
}

fn default_unit() -> String {
    CANONICAL_UNIT.to_string()
}

/// Identity of a commit author or committer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// E-mail address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Forge user name.
    pub username: String,
}

/// Commit metadata attached to a canonical document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit author.
    pub author: Identity,
    /// Commit committer.
    pub committer: Identity,
    /// Whether the commit is new to the pushed ref; always `true` when
    /// collected from the environment.
    #[serde(default)]
    pub distinct: bool,
    /// Commit hash.
    pub id: String,
    /// Commit message.
    pub message: String,
    /// Commit timestamp as reported by CI.
    pub timestamp: String,
    /// Tree hash.
    pub tree_id: String,
    /// Link to the commit.
    pub url: String,
}

impl CommitInfo {
    /// Read commit metadata from the process environment.
    ///
    /// Missing variables default to the empty string.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read commit metadata through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            author: Identity {
                email: get("COMMIT_AUTHOR_EMAIL"),
                name: get("COMMIT_AUTHOR_NAME"),
                username: get("COMMIT_AUTHOR_USERNAME"),
            },
            committer: Identity {
                email: get("COMMIT_COMMITTER_EMAIL"),
                name: get("COMMIT_COMMITTER_NAME"),
                username: get("COMMIT_COMMITTER_USERNAME"),
            },
            distinct: true,
            id: get("COMMIT_ID"),
            message: get("COMMIT_MESSAGE"),
            timestamp: get("COMMIT_TIMESTAMP"),
            tree_id: get("COMMIT_TREE_ID"),
            url: get("COMMIT_URL"),
        }
    }
}

/// Canonical benchmark document written by the normalizer.
///
/// The comparator only needs `benches`; every other field is optional on
/// input so hand-written documents are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchDocument {
    /// Commit the benchmarks were run against.
    #[serde(default)]
    pub commit: CommitInfo,
    /// Creation time in Unix epoch milliseconds.
    #[serde(default)]
    pub date: i64,
    /// Tag of the harness that produced the raw results.
    #[serde(default)]
    pub tool: String,
    /// Available parallelism of the host that normalized the results.
    #[serde(default)]
    pub procs: usize,
    /// Canonical records.
    pub benches: Vec<CanonicalBench>,
}

/// Benchmark name to value for one run, ordered by name.
pub type BenchMap = BTreeMap<String, f64>;

impl BenchDocument {
    /// Build the name to value map for this run.
    ///
    /// Later duplicates of a name overwrite earlier ones.
    pub fn bench_map(&self) -> BenchMap {
        self.benches
            .iter()
            .map(|b| (b.name.clone(), b.value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_raw_result_uses_harness_field_names() {
        let raw: RawResult = serde_json::from_str(
            r#"{"benchmark":"BenchmarkParse","mode":"thrpt","primaryMetric":{"score":2.5,"scoreUnit":"ops/s","scoreError":0.1}}"#,
        )
        .unwrap();
        assert_eq!(raw.benchmark, "BenchmarkParse");
        assert_eq!(raw.primary_metric.score, 2.5);
        assert_eq!(raw.primary_metric.score_unit, "ops/s");
    }

    #[test]
    fn test_comparator_input_only_needs_benches() {
        let doc: BenchDocument =
            serde_json::from_str(r#"{"benches":[{"name":"A","value":100,"range":"± 2"}]}"#)
                .unwrap();
        assert_eq!(doc.benches.len(), 1);
        assert_eq!(doc.benches[0].unit, CANONICAL_UNIT);
        assert_eq!(doc.bench_map().get("A"), Some(&100.0));
    }

    #[test]
    fn test_commit_info_defaults_to_empty() {
        let mut vars = HashMap::new();
        vars.insert("COMMIT_ID", "abc123");
        vars.insert("COMMIT_AUTHOR_NAME", "Sam");
        let info = CommitInfo::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(info.id, "abc123");
        assert_eq!(info.author.name, "Sam");
        assert_eq!(info.author.email, "");
        assert_eq!(info.url, "");
        assert!(info.distinct);

        assert_eq!(serde_json::to_value(&info).unwrap()["distinct"], true);
    }

    #[test]
    fn test_raw_result_fields_default_when_missing() {
        let raw: Vec<RawResult> = serde_json::from_str(
            r#"[{"benchmark":"BenchmarkSkipped"},{"primaryMetric":{"score":3}},{}]"#,
        )
        .unwrap();
        assert_eq!(raw[0].primary_metric, PrimaryMetric::default());
        assert_eq!(raw[1].benchmark, "");
        assert_eq!(raw[1].primary_metric.score, 3.0);
        assert_eq!(raw[1].primary_metric.score_unit, "");
        assert_eq!(raw[2], RawResult::default());
    }

    #[test]
    fn test_bench_map_is_sorted_by_name() {
        let doc = BenchDocument {
            benches: vec![
                CanonicalBench {
                    name: "b".into(),
                    value: 2.0,
                    unit: CANONICAL_UNIT.into(),
                    extra: String::new(),
                },
                CanonicalBench {
                    name: "a".into(),
                    value: 1.0,
                    unit: CANONICAL_UNIT.into(),
                    extra: String::new(),
                },
            ],
            ..Default::default()
        };
        let names: Vec<_> = doc.bench_map().into_keys().collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
