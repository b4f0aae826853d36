// Copyright 2025 benchdiff Contributors
// SPDX-License-Identifier: Apache-2.0

//! I/O operations for benchmark documents and reports.
//!
//! This module reads raw harness output and canonical documents, writes
//! normalized documents, and rewrites comparison reports in place.

use crate::error::{BenchError, Result};
use crate::normalize::{self, NormalizeContext};
use crate::reflow::{self, ReflowOptions};
use crate::result::{BenchDocument, RawResult};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Default file name of the comparison report.
pub const REPORT_FILE: &str = "benchmark-comparison.md";

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| BenchError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_text(path)?;
    serde_json::from_str(&content).map_err(|source| BenchError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| BenchError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read raw harness results from a JSON file.
pub fn read_raw_results(path: impl AsRef<Path>) -> Result<Vec<RawResult>> {
    read_json(path.as_ref())
}

/// Read a canonical benchmark document from a JSON file.
pub fn read_document(path: impl AsRef<Path>) -> Result<BenchDocument> {
    read_json(path.as_ref())
}

/// Write a canonical benchmark document as pretty JSON.
pub fn write_document(doc: &BenchDocument, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(doc)?;
    write_text(path.as_ref(), &json)
}

/// Normalize the raw results in `input` and write the document to `output`.
///
/// Nothing is written when the input cannot be read or parsed.
pub fn normalize_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    ctx: NormalizeContext,
) -> Result<BenchDocument> {
    let raw = read_raw_results(input.as_ref())?;
    let doc = normalize::normalize(&raw, ctx);
    write_document(&doc, output.as_ref())?;
    info!(
        input = %input.as_ref().display(),
        output = %output.as_ref().display(),
        benches = doc.benches.len(),
        "Wrote normalized benchmark document"
    );
    Ok(doc)
}

/// Write a report to `sink`.
pub fn write_report<W: Write>(sink: &mut W, report: &str) -> Result<()> {
    sink.write_all(report.as_bytes())?;
    sink.flush()?;
    Ok(())
}

/// Write a report to a file, or to stdout when `path` is `None`.
pub fn emit_report(path: Option<&Path>, report: &str) -> Result<()> {
    match path {
        Some(path) => write_text(path, report),
        None => write_report(&mut io::stdout().lock(), report),
    }
}

/// Outcome of an in-place reflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflowOutcome {
    /// The report file does not exist; nothing to do.
    Missing,
    /// The report was rewritten.
    Rewritten,
}

/// Reflow the report at `path` in place.
///
/// A missing file is not an error. The file is left untouched when reading
/// or reflowing fails.
pub fn reflow_file(path: impl AsRef<Path>, opts: &ReflowOptions) -> Result<ReflowOutcome> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "Report not found, nothing to reflow");
            return Ok(ReflowOutcome::Missing);
        }
        Err(source) => {
            return Err(BenchError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let reflowed = reflow::reflow(&text, opts)?;
    write_text(path, &reflowed)?;
    info!(path = %path.display(), "Reflowed comparison report");
    Ok(ReflowOutcome::Rewritten)
}
