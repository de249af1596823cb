use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use magpick_core::{
    BatchRequest, BatchSummary, DispatchOptions, ReportWriter, SelectMode, load_request, run_batch,
};
use magpick_db::SqliteStore;

use crate::CliError;
use crate::config::Settings;

/// Resolve every term of a request file and write the chosen links.
pub(crate) fn run_select(
    settings: &Settings,
    request_path: &Path,
    dry_run: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let request = load_request(request_path).map_err(|e| CliError::request(e.to_string()))?;
    if request.is_empty() {
        log::warn!("{} contains no terms", request_path.display());
    }

    if !settings.db_path.exists() {
        return Err(CliError::database(format!(
            "No record database found at {} (run 'magpick import' first)",
            settings.db_path.display(),
        )));
    }
    let store = SqliteStore::open(&settings.db_path)
        .map_err(|e| CliError::database(format!("Failed to open record database: {}", e)))?;

    let mode = SelectMode::from_subtitle_only(settings.subtitle_only);
    log::info!(
        "Selecting {} term(s) from {} ({} mode)",
        request.term_count(),
        request_path.display(),
        mode.if_supports_color(Stderr, |t| t.cyan()),
    );

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(request.term_count() as u64);
        pb.set_style(
            ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
                .expect("static pattern")
                .progress_chars("=> "),
        );
        pb
    };

    let summary = if dry_run {
        let mut stdout = io::stdout().lock();
        write_report(&store, &request, &mut stdout, mode, &pb)?
    } else {
        let file = File::create(&settings.output).map_err(|e| {
            CliError::other(format!(
                "Failed to create output file {}: {}",
                settings.output.display(),
                e
            ))
        })?;
        let mut out = BufWriter::new(file);
        write_report(&store, &request, &mut out, mode, &pb)?
    };
    pb.finish_and_clear();

    log_summary(&summary);
    if !dry_run {
        log::info!(
            "Report written to {}",
            settings
                .output
                .display()
                .if_supports_color(Stderr, |t| t.cyan()),
        );
    }
    Ok(())
}

/// Run the batch into `out`. Only report text is written there; progress
/// and logging stay on stderr.
fn write_report<W: Write>(
    store: &SqliteStore,
    request: &BatchRequest,
    out: &mut W,
    mode: SelectMode,
    pb: &ProgressBar,
) -> Result<BatchSummary, CliError> {
    let mut report = ReportWriter::new(out);
    let summary = run_batch(store, request, &mut report, DispatchOptions::new(mode), |term| {
        pb.set_message(term.to_string());
        pb.inc(1);
    })
    .map_err(|e| CliError::other(e.to_string()))?;
    report.finish()?;
    Ok(summary)
}

fn log_summary(summary: &BatchSummary) {
    crate::log_blank();
    log::info!("{}", "Summary".if_supports_color(Stderr, |t| t.bold()));
    log::info!("  Terms:          {:>6}", summary.terms);
    log::info!("  Queries:        {:>6}", summary.queries);
    log::info!("  Records:        {:>6}", summary.records);
    log::info!(
        "  Links written:  {:>6}",
        summary.written.if_supports_color(Stderr, |t| t.green()),
    );
    if summary.fallbacks > 0 {
        log::info!("  Raw fallbacks:  {:>6}", summary.fallbacks);
    }
    log::info!("  Skipped:        {:>6}", summary.skipped);
    if summary.failed_queries > 0 {
        log::warn!("{} lookup(s) failed", summary.failed_queries);
    }
    if summary.unknown_categories > 0 {
        log::warn!(
            "{} unknown request categor{}",
            summary.unknown_categories,
            if summary.unknown_categories == 1 { "y" } else { "ies" },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpick_db::{ImportRecord, upsert_record};
    use magpick_core::LinkField;

    fn store_with(code: &str, links: &[&str]) -> SqliteStore {
        let store = SqliteStore::in_memory().unwrap();
        let mut record = ImportRecord::new(code);
        record.links = LinkField::List(links.iter().map(|l| l.to_string()).collect());
        upsert_record(store.conn(), &record).unwrap();
        store
    }

    #[test]
    fn report_stream_holds_only_report_text() {
        let store = store_with("MISM-091", &["mism-091-hd", "mism-091-C"]);
        let request = BatchRequest::from_json_str(r#"{"fanhao": ["mism091"]}"#).unwrap();
        let mut out = Vec::new();

        let summary = write_report(
            &store,
            &request,
            &mut out,
            SelectMode::Full,
            &ProgressBar::hidden(),
        )
        .unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "mism091:\n\nmism-091-C\n\n"
        );
    }

    #[test]
    fn subtitle_only_report_keeps_heading_for_misses() {
        let store = store_with("MISM-091", &["mism-091-hd"]);
        let request = BatchRequest::from_json_str(r#"{"fanhao": ["mism091"]}"#).unwrap();
        let mut out = Vec::new();

        write_report(
            &store,
            &request,
            &mut out,
            SelectMode::SubtitleOnly,
            &ProgressBar::hidden(),
        )
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "mism091:\n\n\n");
    }
}
