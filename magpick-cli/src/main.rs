//! magpick CLI
//!
//! Command-line interface for picking download links out of a catalog
//! record database.

mod cli_types;
mod commands;
mod config;
mod error;
mod logging;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
use config::{Overrides, Settings};
pub(crate) use error::CliError;

/// Log an empty line at info level (respects `--quiet`).
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Select {
            file,
            chn,
            output,
            dry_run,
        } => {
            let settings = Settings::load(Overrides {
                db: cli.db,
                chn,
                output,
            })?;
            commands::select::run_select(&settings, &file, dry_run, quiet)
        }
        Commands::Import { files } => {
            let settings = Settings::load(Overrides {
                db: cli.db,
                ..Default::default()
            })?;
            commands::import::run_import(&settings.db_path, &files)
        }
        Commands::Stats => {
            let settings = Settings::load(Overrides {
                db: cli.db,
                ..Default::default()
            })?;
            commands::stats::run_stats(&settings.db_path)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let settings = Settings::load(Overrides {
                    db: cli.db,
                    ..Default::default()
                })?;
                commands::config::run_config_show(&settings);
                Ok(())
            }
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}
