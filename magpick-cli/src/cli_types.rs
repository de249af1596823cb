//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "magpick")]
#[command(about = "Pick the best download link for catalog records", long_about = None)]
pub(crate) struct Cli {
    /// Record database to use (defaults to the configured path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Look up every term of a request file and write the chosen links
    Select {
        /// JSON request file mapping fanhao/title/actress/series to term lists
        #[arg(short, long)]
        file: PathBuf,

        /// 1 = only subtitle-tagged links, 0 = best link by priority
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=1))]
        chn: Option<u8>,

        /// Output report path; ".txt" is added when there is no extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report to stdout instead of writing the output file
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Import crawler export files (JSON array or JSON lines) into the database
    Import {
        /// Export files to import
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show record database statistics
    Stats,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings and where each came from
    Show,

    /// Print the config file path
    Path,
}
