//! CLI definitions for multivac
//!
//! Kept apart from main.rs so the argument structure can be unit tested
//! without running any command.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Build clap styles for help output.
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

/// Version string; dev builds carry the git commit.
pub fn version() -> String {
    match option_env!("VERGEN_GIT_SHA") {
        Some(sha) if !cfg!(feature = "release") => {
            format!("{} ({})", env!("CARGO_PKG_VERSION"), sha)
        }
        _ => env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[derive(Parser)]
#[command(name = "multivac")]
#[command(about = "[ multivac ] - test statuses and failure categories from CI job logs")]
#[command(
    long_about = "multivac - sensors for CI job logs.

Extracts a per-test status timeline (pass, fail, transient fail, hang, ...)
from test-run output and assigns each failed job a failure category by
matching known signatures against the end of its log.

QUICK START:
    multivac status 1234.log           Per-test statuses of one job
    multivac classify 1234.log         Failure category of one job
    multivac batch logs/ --failure-stats
    multivac catalogue                 Document known failure signatures

Set MULTIVAC_LOG=debug to see grammar and classification decisions."
)]
pub struct Cli {
    /// Configuration file (default: ~/.config/multivac/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print test statuses found in a job log
    #[command(long_about = "Print test statuses found in a job log.

One line per test and configuration with its final status. A test that
failed and then passed on retry is reported as `transient fail`.

EXAMPLES:
    multivac status 1234.log
    multivac status 1234.log --raw      Every attempt, in log order
    multivac status 1234.log --json")]
    Status {
        /// Job log to read
        log: PathBuf,
        /// Print every status event instead of one per test
        #[arg(long)]
        raw: bool,
        /// Print JSON lines
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        cache: CacheArgs,
    },

    /// Assign a failure category to a job log
    Classify {
        /// Job log to read
        log: PathBuf,
        #[command(flatten)]
        catalogue: CatalogueArgs,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Build reports for many job logs in parallel
    #[command(long_about = "Build reports for many job logs in parallel.

Prints one JSON line per log with its category, build facts, test statuses
and failed test attempts. Directories are searched for *.log files.

EXAMPLES:
    multivac batch logs/
    multivac batch logs/ --failure-stats
    multivac batch 1.log 2.log --watch-failure testrun_test_hung")]
    Batch {
        /// Log files or directories holding *.log files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        catalogue: CatalogueArgs,
        /// Worker threads (default: one per core)
        #[arg(long, short = 'j')]
        workers: Option<usize>,
        /// Print job counts per failure category instead of reports
        #[arg(long)]
        failure_stats: bool,
        /// Print the matched line of every job with this category instead of reports
        #[arg(long, value_name = "TAG")]
        watch_failure: Option<String>,
        #[command(flatten)]
        cache: CacheArgs,
    },

    /// Print Markdown documentation of the failure catalogue
    Catalogue {
        #[command(flatten)]
        catalogue: CatalogueArgs,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args)]
pub struct CatalogueArgs {
    /// Catalogue file replacing the built-in failure signatures
    #[arg(long = "catalogue", value_name = "FILE")]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CacheArgs {
    /// Read and write the status cache next to each log
    #[arg(long, conflicts_with = "no_cache")]
    pub cache: bool,
    /// Ignore the status cache even when enabled in the configuration
    #[arg(long)]
    pub no_cache: bool,
}

impl CacheArgs {
    /// Override for `status.cache`, if any flag was given.
    pub fn resolve(&self) -> Option<bool> {
        match (self.cache, self.no_cache) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Write the current configuration to the config file
    Init,
}
