//! Benchmark comparison reports for CI.
//!
//! This crate turns two benchmark runs (a base revision and a candidate
//! revision) into an aligned comparison table suitable for a fixed-width
//! code block in a pull request comment.
//!
//! # Pipeline
//!
//! ```no_run
//! use benchdiff::{io, markdown, reflow, NormalizeContext};
//!
//! # fn main() -> benchdiff::Result<()> {
//! // Raw harness output -> canonical documents
//! io::normalize_file("base-raw.json", "base.json", NormalizeContext::from_process())?;
//! io::normalize_file("pr-raw.json", "pr.json", NormalizeContext::from_process())?;
//!
//! // Canonical documents -> loose comparison table
//! let base = io::read_document("base.json")?;
//! let pr = io::read_document("pr.json")?;
//! let header = markdown::ReportHeader::detect("my-crate");
//! let table = markdown::generate_comparison(&base, &pr, &header, &Default::default());
//!
//! // Loose table -> aligned table with a diff column
//! let report = reflow::reflow(&table, &Default::default())?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`result`] - Raw and canonical benchmark records
//! - [`normalize`] - Raw harness records to canonical documents
//! - [`markdown`] - Side-by-side comparison table
//! - [`reflow`] - Column alignment and diff computation
//! - [`probe`] - CPU model detection for report headers
//! - [`io`] - Reading and writing documents and reports

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod format;
pub mod io;
pub mod markdown;
pub mod normalize;
pub mod probe;
pub mod reflow;
pub mod result;

pub use error::{BenchError, Result};
pub use markdown::{CompareOptions, ReportHeader};
pub use normalize::NormalizeContext;
pub use reflow::ReflowOptions;
pub use result::{BenchDocument, BenchMap, CanonicalBench, CommitInfo, RawResult};

/// Render the comparison of two documents and reflow it in one step.
pub fn compare_and_reflow(
    base: &BenchDocument,
    pr: &BenchDocument,
    header: &ReportHeader,
    compare: &CompareOptions,
    reflow: &ReflowOptions,
) -> Result<String> {
    let table = markdown::generate_comparison(base, pr, header, compare);
    reflow::reflow(&table, reflow)
}
