use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::CliError;
use crate::config::{Settings, config_path};

/// Show effective settings and their sources.
pub(crate) fn run_config_show(settings: &Settings) {
    log::info!(
        "{}",
        "magpick Configuration".if_supports_color(Stderr, |t| t.bold()),
    );
    crate::log_blank();

    match config_path() {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stderr, |t| t.cyan()),
                "(exists)".if_supports_color(Stderr, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stderr, |t| t.cyan()),
                "(not found)".if_supports_color(Stderr, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stderr, |t| t.red()),
            );
        }
    }
    crate::log_blank();

    let subtitle_only = if settings.subtitle_only { "1" } else { "0" };
    let fields = [
        (
            "database",
            settings.db_path.display().to_string(),
            settings.db_source,
        ),
        (
            "subtitle_only",
            subtitle_only.to_string(),
            settings.subtitle_only_source,
        ),
        (
            "output",
            settings.output.display().to_string(),
            settings.output_source,
        ),
    ];
    for (name, value, source) in fields {
        log::info!(
            "  {:<14} {} {}",
            name,
            value,
            format!("({})", source).if_supports_color(Stderr, |t| t.dimmed()),
        );
    }
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = config_path().ok_or_else(|| CliError::config("Could not determine config directory"))?;
    println!("{}", path.display());
    Ok(())
}
