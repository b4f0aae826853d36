// Copyright 2025 benchdiff Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types shared by the normalizer, comparator and reflow engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while processing benchmark reports.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Input file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid JSON of the expected shape
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Document could not be serialized
    #[error("failed to serialize benchmark document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A numeric table token carries a unit suffix nobody knows about
    #[error("unexpected unit suffix {suffix:?} in token {token:?}")]
    UnexpectedUnit { token: String, suffix: String },

    /// Output stream error
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for benchmark report operations.
pub type Result<T> = std::result::Result<T, BenchError>;
