//! CLI argument definitions for the airline ETL.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "aero-etl",
    version,
    about = "Airline ETL - load passenger, flight and fare feeds",
    long_about = "Load passenger, flight and fare feeds from CSV and spreadsheet files.\n\n\
                  Rows are validated and canonicalized before loading; rejected rows\n\
                  are written to per-feed error reports and every run ends with a\n\
                  JSON run report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: ./aero-etl.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row values (names, documents, contacts) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process every feed file in the input directory.
    Run(RunArgs),

    /// List input files with their feed and a preview of their rows.
    Files(FilesArgs),

    /// Print the canonical mapping tables in effect.
    Mappings,
}

/// Directory overrides for the configured paths.
#[derive(Args)]
pub struct DirArgs {
    /// Input directory (overrides `paths.input_dir`).
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Output directory for the run report (overrides `paths.output_dir`).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for rejection reports (overrides `paths.errors_dir`).
    #[arg(long = "errors-dir", value_name = "DIR")]
    pub errors_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub dirs: DirArgs,

    /// Exit with status 1 when any row was rejected or failed to load.
    #[arg(long = "fail-on-errors")]
    pub fail_on_errors: bool,
}

#[derive(Parser)]
pub struct FilesArgs {
    #[command(flatten)]
    pub dirs: DirArgs,

    /// Rows to preview per file section.
    #[arg(long = "rows", value_name = "N", default_value_t = 5)]
    pub rows: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
