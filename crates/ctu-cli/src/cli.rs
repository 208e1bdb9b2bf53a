//! CLI argument definitions for the trial-universe pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "trial-universe",
    version,
    about = "Trial Universe - clinical trial metadata pipeline",
    long_about = "Download clinical trial metadata from the ClinicalTrials.gov v2 registry,\n\
                  flatten it into tabular rows, curate eligibility-criterion extractions\n\
                  against lookup tables, compile per-trial selection rules and aggregate\n\
                  everything into one multi-level summary table."
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
    /// Download the study corpus from the registry.
    Download(DownloadArgs),

    /// Flatten a downloaded corpus into the core field table.
    Extract(ExtractArgs),

    /// Curate criterion instance tables and compile selection rules.
    Curate(CurateArgs),

    /// Join core and criterion tables into the summary export.
    Aggregate(AggregateArgs),
}

#[derive(Parser)]
pub struct DownloadArgs {
    /// Directory for the NDJSON corpus (created if missing).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Essie query term; repeat for multiple stages (default: built-in query).
    #[arg(long = "query-term", value_name = "TERM")]
    pub query_term: Vec<String>,

    /// Studies requested per page (capped at the registry maximum).
    #[arg(long = "page-size", value_name = "N", default_value_t = 1000)]
    pub page_size: usize,
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// NDJSON corpus written by `download`.
    #[arg(long = "corpus", value_name = "FILE")]
    pub corpus: PathBuf,

    /// Output CSV of flattened trial fields.
    #[arg(long = "output-file", value_name = "FILE")]
    pub output_file: PathBuf,
}

#[derive(Parser)]
pub struct CurateArgs {
    /// Directory of `*_instances.csv` criterion extraction tables.
    #[arg(long = "instance-dir", value_name = "DIR")]
    pub instance_dir: PathBuf,

    /// Directory of resource lookup tables.
    #[arg(long = "resource-dir", value_name = "DIR")]
    pub resource_dir: PathBuf,

    /// Directory for the curated table and selection rules (created if missing).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,
}

#[derive(Parser)]
pub struct AggregateArgs {
    /// Core field table written by `extract`.
    #[arg(long = "core-file", value_name = "FILE")]
    pub core_file: PathBuf,

    /// Directory of `<Criterion>_extractions.csv` tables.
    #[arg(long = "criterion-dir", value_name = "DIR")]
    pub criterion_dir: PathBuf,

    /// Curated instance table written by `curate`.
    #[arg(long = "curated-file", value_name = "FILE")]
    pub curated_file: PathBuf,

    /// Directory for the summary export (created if missing).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Optional `trialId,field,value` override table for core fields.
    #[arg(long = "overrides", value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Optional removal list, one trial id per line.
    #[arg(long = "removals", value_name = "FILE")]
    pub removals: Option<PathBuf>,
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn download_accepts_repeated_query_terms() {
        let cli = Cli::try_parse_from([
            "trial-universe",
            "download",
            "--output-dir",
            "out",
            "--query-term",
            "AREA[Condition] melanoma",
            "--query-term",
            "AREA[Condition] lymphoma",
        ])
        .unwrap();
        let Command::Download(args) = cli.command else {
            panic!("expected download subcommand");
        };
        assert_eq!(args.query_term.len(), 2);
        assert_eq!(args.page_size, 1000);
    }
}
