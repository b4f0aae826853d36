//! CLI for benchdiff.
//!
//! This crate provides the `benchdiff` command with the `normalize`,
//! `compare`, `reflow` and `report` subcommands, and the entry points of the
//! standalone `bench-normalize`, `bench-compare` and `bench-reflow` binaries.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use benchdiff::io::{self, ReflowOutcome, REPORT_FILE};
use benchdiff::normalize::DEFAULT_TOOL;
use benchdiff::{markdown, CompareOptions, NormalizeContext, ReflowOptions, ReportHeader};
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// benchdiff CLI.
#[derive(Parser, Debug)]
#[command(name = "benchdiff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log progress to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert raw harness results into a canonical benchmark document.
    ///
    /// Commit metadata is taken from the COMMIT_* environment variables
    /// (a `.env` file in the working directory is honored).
    Normalize(NormalizeArgs),

    /// Print a side-by-side comparison of two canonical documents.
    Compare(CompareArgs),

    /// Align the comparison report in place and add the diff column.
    Reflow(ReflowArgs),

    /// Compare two documents and reflow the result in one step.
    Report(ReportArgs),
}

/// Arguments of the `normalize` command.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Raw harness results (JSON list).
    pub input: PathBuf,

    /// Where to write the canonical document.
    pub output: PathBuf,

    /// Tool tag recorded in the document.
    #[arg(long, env = "BENCHDIFF_TOOL", default_value = DEFAULT_TOOL)]
    pub tool: String,
}

/// Arguments of the `compare` command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Canonical document of the base revision.
    pub base: PathBuf,

    /// Canonical document of the candidate revision.
    pub pr: PathBuf,

    /// Package name shown in the report header.
    #[arg(long, env = "BENCHDIFF_PKG", default_value = env!("CARGO_PKG_NAME"))]
    pub pkg: String,

    /// Width of the benchmark name column.
    #[arg(long, default_value_t = 52)]
    pub name_width: usize,

    /// Write the report to a file instead of stdout.
    #[arg(short, long, env = "BENCHDIFF_OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Arguments of the `report` command.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Inputs and header options.
    #[command(flatten)]
    pub compare: CompareArgs,

    /// Reflow layout.
    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Arguments of the `reflow` command.
#[derive(Args, Debug)]
pub struct ReflowArgs {
    /// Comparison report to rewrite in place.
    #[arg(env = "BENCHDIFF_REPORT", default_value = REPORT_FILE)]
    pub report: PathBuf,

    /// Reflow layout.
    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Reflow layout options.
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Spaces added in front of every table line.
    #[arg(long, default_value_t = 8)]
    pub indent: usize,

    /// Percent change beyond which a row is flagged slower or faster.
    #[arg(long, default_value_t = 10.0)]
    pub threshold: f64,
}

impl LayoutArgs {
    fn options(&self) -> ReflowOptions {
        ReflowOptions {
            indent: " ".repeat(self.indent),
            threshold: self.threshold,
            ..ReflowOptions::default()
        }
    }
}

impl Default for LayoutArgs {
    fn default() -> Self {
        Self {
            indent: 8,
            threshold: 10.0,
        }
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or info
/// messages with `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load a `.env` file if one exists.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable environment file"),
    }
}

/// Normalize `input` into `output`.
pub fn normalize(args: &NormalizeArgs) -> Result<()> {
    let ctx = NormalizeContext::from_process().with_tool(&args.tool);
    let doc = io::normalize_file(&args.input, &args.output, ctx)
        .with_context(|| format!("normalizing {}", args.input.display()))?;
    info!(benches = doc.benches.len(), "Normalization complete");
    Ok(())
}

fn render_comparison(args: &CompareArgs) -> Result<String> {
    let base = io::read_document(&args.base).context("reading base run")?;
    let pr = io::read_document(&args.pr).context("reading candidate run")?;
    let header = ReportHeader::detect(&args.pkg);
    let opts = CompareOptions {
        name_width: args.name_width,
    };
    Ok(markdown::generate_comparison(&base, &pr, &header, &opts))
}

/// Print the comparison of two documents.
pub fn compare(args: &CompareArgs) -> Result<()> {
    let report = render_comparison(args)?;
    io::emit_report(args.output.as_deref(), &report).context("writing comparison report")?;
    Ok(())
}

/// Compare and reflow in one step.
pub fn report(args: &ReportArgs) -> Result<()> {
    let table = render_comparison(&args.compare)?;
    let report = benchdiff::reflow::reflow(&table, &args.layout.options())
        .context("reflowing comparison report")?;
    io::emit_report(args.compare.output.as_deref(), &report)
        .context("writing comparison report")?;
    Ok(())
}

/// Reflow the report file in place.
pub fn reflow(report: &Path, layout: &LayoutArgs) -> Result<ReflowOutcome> {
    io::reflow_file(report, &layout.options())
        .with_context(|| format!("reflowing {}", report.display()))
}

/// Dispatch a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Normalize(args) => normalize(&args),
        Commands::Compare(args) => compare(&args),
        Commands::Report(args) => report(&args),
        Commands::Reflow(args) => reflow(&args.report, &args.layout).map(|_| ()),
    }
}

/// Parse arguments, exiting with status 1 on usage errors.
///
/// `--help` and `--version` keep clap's behavior.
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(parsed) => parsed,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Run the CLI with the process arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> Result<()> {
    let cli: Cli = parse_or_exit();
    init_tracing(cli.verbose);
    load_dotenv();
    execute(cli)
}

/// `bench-normalize` arguments.
#[derive(Parser, Debug)]
#[command(name = "bench-normalize", version, about = "Normalize raw benchmark results")]
pub struct NormalizeCli {
    #[command(flatten)]
    args: NormalizeArgs,
}

/// `bench-compare` arguments.
#[derive(Parser, Debug)]
#[command(name = "bench-compare", version, about = "Compare two benchmark documents")]
pub struct CompareCli {
    #[command(flatten)]
    args: CompareArgs,
}

/// `bench-reflow` arguments.
#[derive(Parser, Debug)]
#[command(name = "bench-reflow", version, about = "Align a benchmark comparison report")]
pub struct ReflowCli {
    #[command(flatten)]
    args: ReflowArgs,
}

/// Entry point of `bench-normalize`.
pub fn run_normalize() -> Result<()> {
    let cli: NormalizeCli = parse_or_exit();
    init_tracing(false);
    load_dotenv();
    normalize(&cli.args)
}

/// Entry point of `bench-compare`.
pub fn run_compare() -> Result<()> {
    let cli: CompareCli = parse_or_exit();
    init_tracing(false);
    compare(&cli.args)
}

/// Entry point of `bench-reflow`.
pub fn run_reflow() -> Result<()> {
    let cli: ReflowCli = parse_or_exit();
    init_tracing(false);
    reflow(&cli.args.report, &cli.args.layout).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
        NormalizeCli::command().debug_assert();
        CompareCli::command().debug_assert();
        ReflowCli::command().debug_assert();
    }

    #[test]
    fn test_compare_requires_two_paths() {
        let err = Cli::try_parse_from(["benchdiff", "compare", "base.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_reflow_defaults_to_report_file() {
        let cli = Cli::try_parse_from(["benchdiff", "reflow"]).unwrap();
        match cli.command {
            Commands::Reflow(args) => {
                if std::env::var_os("BENCHDIFF_REPORT").is_none() {
                    assert_eq!(args.report, PathBuf::from(REPORT_FILE));
                }
                assert_eq!(args.layout.indent, 8);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_layout_args_map_to_options() {
        let layout = LayoutArgs {
            indent: 4,
            threshold: 5.0,
        };
        let opts = layout.options();
        assert_eq!(opts.indent, "    ");
        assert_eq!(opts.threshold, 5.0);
        assert_eq!(opts.offset_margin, ReflowOptions::default().offset_margin);
        assert_eq!(LayoutArgs::default().options().indent, " ".repeat(8));
    }

    #[test]
    fn test_report_accepts_layout_flags() {
        let cli = Cli::try_parse_from([
            "benchdiff", "report", "a.json", "b.json", "--indent", "0", "-o", "out.md",
        ])
        .unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.layout.indent, 0);
                assert_eq!(args.compare.output, Some(PathBuf::from("out.md")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["benchdiff", "compare", "a.json", "b.json", "--indent", "0"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["benchdiff", "reflow", "report.md", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
