//! CLI argument definitions for tabstat.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tabstat_cli::analysis::FunnelStage;

#[derive(Parser)]
#[command(
    name = "tabstat",
    version,
    about = "Descriptive statistics over CSV files",
    long_about = "Descriptive statistics over CSV files.\n\n\
                  Runs one of three analyses: web funnel drop-off, insurance cost\n\
                  breakdown, or Jeopardy keyword search. Reports go to stdout."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// Measure drop-off between the stages of a web funnel.
    Funnel(FunnelArgs),

    /// Break insurance charges down by age, sex, smoking and children.
    Insurance(InsuranceArgs),

    /// Search Jeopardy questions for keywords and summarise values and answers.
    Jeopardy(JeopardyArgs),
}

#[derive(Parser)]
pub struct FunnelArgs {
    /// Folder holding one CSV file per stage.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Funnel stage as FILE_STEM or FILE_STEM:TIME_COLUMN, in funnel order.
    ///
    /// Repeat for each stage. Defaults to visits:visit_time, cart, checkout,
    /// purchase.
    #[arg(long = "stage", value_name = "STAGE", value_parser = FunnelStage::parse)]
    pub stages: Vec<FunnelStage>,
}

#[derive(Parser)]
pub struct InsuranceArgs {
    /// Insurance CSV file.
    #[arg(value_name = "PATH", default_value = "insurance.csv")]
    pub path: PathBuf,

    /// Results file (default: children_costs_results.txt next to PATH).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct JeopardyArgs {
    /// Jeopardy CSV file.
    #[arg(value_name = "PATH", default_value = "jeopardy.csv")]
    pub path: PathBuf,

    /// Keyword every matching question must contain as a whole word.
    #[arg(long = "word", value_name = "WORD", default_values = ["King", "England"])]
    pub words: Vec<String>,

    /// Number of most frequent answers to list.
    #[arg(long = "top", value_name = "N", default_value_t = 5)]
    pub top: usize,
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
