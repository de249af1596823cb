use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use magpick_db::{ImportStats, import_records, load_export, open_database};

use crate::CliError;

/// Import crawler export files into the record database.
///
/// A file that fails to parse is reported and skipped; the others still load.
pub(crate) fn run_import(db_path: &Path, files: &[PathBuf]) -> Result<(), CliError> {
    let mut conn = open_database(db_path)
        .map_err(|e| CliError::database(format!("Failed to open record database: {}", e)))?;

    let mut total = ImportStats::default();
    let mut failed = 0usize;

    for path in files {
        let records = match load_export(path) {
            Ok(records) => records,
            Err(e) => {
                log::warn!(
                    "  {} {}",
                    "\u{2718}".if_supports_color(Stderr, |t| t.red()),
                    e,
                );
                failed += 1;
                continue;
            }
        };

        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let stats = import_records(&mut conn, &source, &records)
            .map_err(|e| CliError::database(format!("Import of {} failed: {}", source, e)))?;

        log::info!(
            "  {} {}: {} created, {} updated, {} unchanged",
            "\u{2714}".if_supports_color(Stderr, |t| t.green()),
            source.if_supports_color(Stderr, |t| t.bold()),
            stats.created,
            stats.updated,
            stats.unchanged,
        );
        total.created += stats.created;
        total.updated += stats.updated;
        total.unchanged += stats.unchanged;
    }

    crate::log_blank();
    log::info!(
        "Imported {} record(s) into {}",
        total.total(),
        db_path.display(),
    );
    if failed > 0 {
        return Err(CliError::other(format!(
            "{} of {} file(s) could not be read",
            failed,
            files.len()
        )));
    }
    Ok(())
}
