use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::CliError;

pub(crate) fn run_stats(db_path: &Path) -> Result<(), CliError> {
    if !db_path.exists() {
        log::warn!("No record database found at {}", db_path.display());
        log::info!("Run 'magpick import <export.json>' to create one.");
        return Ok(());
    }

    let conn = magpick_db::open_database(db_path)
        .map_err(|e| CliError::database(format!("Failed to open record database: {}", e)))?;

    let stats = magpick_db::store_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query store stats: {}", e)))?;

    log::info!(
        "{}",
        "Record Database Statistics".if_supports_color(Stderr, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Records:        {:>8}", stats.records);
    log::info!("  With links:     {:>8}", stats.with_links);
    log::info!("  Without links:  {:>8}", stats.without_links);
    log::info!("  Actresses:      {:>8}", stats.actresses);
    log::info!("  Imports:        {:>8}", stats.imports);

    let logs = magpick_db::list_import_logs(&conn, Some(5))
        .map_err(|e| CliError::database(format!("Failed to list imports: {}", e)))?;
    if !logs.is_empty() {
        crate::log_blank();
        log::info!("{}", "Recent imports".if_supports_color(Stderr, |t| t.bold()));
        for entry in logs {
            log::info!(
                "  {}  {}  +{} ~{} ={}",
                entry.imported_at.if_supports_color(Stderr, |t| t.dimmed()),
                entry.source_name,
                entry.records_created,
                entry.records_updated,
                entry.records_unchanged,
            );
        }
    }

    Ok(())
}
