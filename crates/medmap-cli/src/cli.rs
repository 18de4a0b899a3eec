//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "medmap",
    version,
    about = "Normalize multi-source medical billing exports",
    long_about = "Normalize insurance plans and diagnosis descriptions across billing exports.\n\n\
                  Reports diagnosis codes recorded with more than one description and\n\
                  assigns ordinal categories to procedure codes."
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

    /// Prefix log lines with timestamps (pretty and compact formats).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the module path of each log event.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// Allow insurance plans and diagnosis text to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize source tables and write partitions and reports.
    Run(RunArgs),

    /// Load the rule tables and report entries that feed into each other.
    CheckRules(RuleArgs),

    /// Merge the configured payer fee schedules into one keyed table.
    FeeSchedule(FeeArgs),
}

/// Rule table selection shared by every command.
#[derive(Args)]
pub struct RuleArgs {
    /// TOML run configuration.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Substitution rules CSV (ReplaceLowerContains, ReplaceTo).
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Exact map CSV (Source, Destination).
    #[arg(long = "exact-map", value_name = "PATH")]
    pub exact_map: Option<PathBuf>,

    /// Comma-separated procedure codes that get their own category.
    #[arg(long = "whitelist", value_name = "CODES")]
    pub whitelist: Option<String>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Source CSV files. Each file's directory name becomes its source tag.
    #[arg(value_name = "CSV", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory for partitions and reports.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// List every whitelist code in the category table, observed or not.
    #[arg(long = "include-unobserved-whitelist")]
    pub include_unobserved_whitelist: bool,

    /// Insurance plan column.
    #[arg(long = "insurance-column", value_name = "NAME")]
    pub insurance_column: Option<String>,

    /// Prefix identifying diagnosis columns.
    #[arg(long = "diagnosis-prefix", value_name = "PREFIX")]
    pub diagnosis_prefix: Option<String>,

    /// Procedure code column.
    #[arg(long = "procedure-column", value_name = "NAME")]
    pub procedure_column: Option<String>,

    /// Report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct FeeArgs {
    /// TOML run configuration with `[[fee_schedules]]` entries.
    #[arg(long = "config", value_name = "PATH")]
    pub config: PathBuf,

    /// Output directory for fee_schedule.csv.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Report without writing the merged schedule.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
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
