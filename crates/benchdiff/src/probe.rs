// Copyright 2025 benchdiff Contributors
// SPDX-License-Identifier: Apache-2.0

//! Best-effort CPU model detection for report headers.
//!
//! Detection is an ordered chain of [`CpuProbe`] strategies. The first probe
//! returning a model wins; when every probe fails the report shows
//! [`UNKNOWN_CPU`]. Failures are never surfaced to the caller.

use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Placeholder shown when no probe succeeds.
pub const UNKNOWN_CPU: &str = "GitHub Actions Runner";

/// A single CPU model detection strategy.
pub trait CpuProbe {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Return the CPU model, or `None` if this strategy does not apply.
    fn probe(&self) -> Option<String>;
}

/// Runs an external command and extracts the model from its output.
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
    /// Line prefix to look for, or `None` to take the whole first line.
    field: Option<String>,
}

impl CommandProbe {
    /// Probe that takes the first non-empty output line.
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            field: None,
        }
    }

    /// Probe that reads a `Field: value` line from the output.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl CpuProbe for CommandProbe {
    fn name(&self) -> &str {
        &self.program
    }

    fn probe(&self) -> Option<String> {
        let output = Command::new(&self.program).args(&self.args).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        match &self.field {
            Some(field) => find_field(&stdout, field),
            None => stdout
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(str::to_string),
        }
    }
}

/// Reads a `key : value` style platform information file such as
/// `/proc/cpuinfo`.
pub struct FileProbe {
    path: PathBuf,
    field: String,
}

impl FileProbe {
    /// Create a file probe for `field` in `path`.
    pub fn new(path: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            field: field.into(),
        }
    }
}

impl CpuProbe for FileProbe {
    fn name(&self) -> &str {
        "file"
    }

    fn probe(&self) -> Option<String> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        find_field(&content, &self.field)
    }
}

/// Find the first `field: value` line and return the trimmed value.
fn find_field(text: &str, field: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim() != field {
            return None;
        }
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// The default probe chain for the current platform.
pub fn default_probes() -> Vec<Box<dyn CpuProbe>> {
    let mut probes: Vec<Box<dyn CpuProbe>> = Vec::new();
    if cfg!(target_os = "macos") {
        probes.push(Box::new(CommandProbe::new(
            "sysctl",
            &["-n", "machdep.cpu.brand_string"],
        )));
    } else {
        probes.push(Box::new(
            CommandProbe::new("lscpu", &[]).with_field("Model name"),
        ));
    }
    probes.push(Box::new(FileProbe::new("/proc/cpuinfo", "model name")));
    probes
}

/// Run `probes` in order and return the first model found.
pub fn detect_cpu_with(probes: &[Box<dyn CpuProbe>]) -> String {
    for probe in probes {
        if let Some(model) = probe.probe() {
            debug!(probe = probe.name(), model = %model, "CPU model detected");
            return model;
        }
        debug!(probe = probe.name(), "CPU probe found nothing");
    }
    UNKNOWN_CPU.to_string()
}

/// Detect the CPU model with [`default_probes`].
pub fn detect_cpu() -> String {
    detect_cpu_with(&default_probes())
}
