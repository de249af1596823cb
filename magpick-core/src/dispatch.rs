//! Batch dispatch: request terms → store lookups → selected links → report.

use std::io::Write;

use serde_json::Value;
use thiserror::Error;

use crate::normalize::queries_for;
use crate::report::ReportWriter;
use crate::request::BatchRequest;
use crate::select::{SelectMode, select_with_reason};
use crate::store::RecordStore;
use crate::types::{LinkField, Record};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for a batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    pub mode: SelectMode,
}

impl DispatchOptions {
    pub fn new(mode: SelectMode) -> Self {
        Self { mode }
    }
}

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A link was chosen by the cascade.
    Selected(String),
    /// The link field could not be scanned; its first raw element was used.
    RawFallback(String),
    /// Nothing written for this record.
    Skipped(SkipReason),
}

/// Why a record produced no line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingField,
    TypeMismatch,
    EmptyCandidateList,
    NoSubtitleLink,
}

/// Decide the report line for one record.
pub fn resolve_record(record: &Record, mode: SelectMode) -> RecordOutcome {
    match &record.links {
        LinkField::Missing => RecordOutcome::Skipped(SkipReason::MissingField),
        LinkField::List(links) if links.is_empty() => {
            RecordOutcome::Skipped(SkipReason::EmptyCandidateList)
        }
        LinkField::List(links) => match select_with_reason(links, mode) {
            Some(selection) => {
                log::debug!(
                    "{}: picked candidate {} of {} ({})",
                    record.code,
                    selection.index + 1,
                    links.len(),
                    selection.reason,
                );
                RecordOutcome::Selected(selection.link.to_string())
            }
            None => RecordOutcome::Skipped(SkipReason::NoSubtitleLink),
        },
        LinkField::Mixed(items) => {
            // The scan only trips over the first non-string element, so an
            // accept rule among the strings before it still wins.
            let leading: Vec<&str> = items.iter().map_while(Value::as_str).collect();
            match select_with_reason(&leading, SelectMode::SubtitleOnly) {
                Some(selection) => {
                    log::debug!(
                        "{}: picked candidate {} of {} ({})",
                        record.code,
                        selection.index + 1,
                        items.len(),
                        selection.reason,
                    );
                    RecordOutcome::Selected(selection.link.to_string())
                }
                None => type_mismatch(record, mode),
            }
        }
        LinkField::Malformed(_) => type_mismatch(record, mode),
    }
}

/// Full mode recovers the first raw element; subtitle-only mode skips.
fn type_mismatch(record: &Record, mode: SelectMode) -> RecordOutcome {
    match mode {
        SelectMode::Full => match record.links.first_raw() {
            Some(raw) => RecordOutcome::RawFallback(raw),
            None => RecordOutcome::Skipped(SkipReason::TypeMismatch),
        },
        SelectMode::SubtitleOnly => RecordOutcome::Skipped(SkipReason::TypeMismatch),
    }
}

/// Counters for a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub terms: usize,
    pub queries: usize,
    pub failed_queries: usize,
    pub records: usize,
    pub written: usize,
    pub fallbacks: usize,
    pub skipped: usize,
    pub unknown_categories: usize,
}

/// Run every term of `request` against `store`, writing chosen links to `report`.
///
/// Lookup failures are logged and count as empty results; only report I/O
/// errors end the run. `on_term` is called after each term (for progress).
pub fn run_batch<S, W>(
    store: &S,
    request: &BatchRequest,
    report: &mut ReportWriter<W>,
    options: DispatchOptions,
    mut on_term: impl FnMut(&str),
) -> Result<BatchSummary, DispatchError>
where
    S: RecordStore,
    W: Write,
{
    let mut summary = BatchSummary::default();

    for group in &request.groups {
        let category = group.category;
        if category.is_none() {
            log::warn!(
                "Unknown request category '{}', terms will be skipped",
                group.key,
            );
            summary.unknown_categories += 1;
        }

        for term in &group.terms {
            summary.terms += 1;
            report.write_heading(term)?;

            let Some(category) = category else {
                on_term(term);
                continue;
            };

            for query in queries_for(category, term) {
                summary.queries += 1;
                let records = match store.lookup(&query) {
                    Ok(records) => records,
                    Err(e) => {
                        log::warn!("Lookup {} failed: {}", query, e);
                        summary.failed_queries += 1;
                        Vec::new()
                    }
                };
                log::debug!("{} -> {} record(s)", query, records.len());

                for record in &records {
                    summary.records += 1;
                    match resolve_record(record, options.mode) {
                        RecordOutcome::Selected(link) => {
                            report.write_link(&link)?;
                            summary.written += 1;
                        }
                        RecordOutcome::RawFallback(link) => {
                            log::debug!(
                                "{}: link field is not a list, using first raw element",
                                record.code,
                            );
                            report.write_link(&link)?;
                            summary.written += 1;
                            summary.fallbacks += 1;
                        }
                        RecordOutcome::Skipped(reason) => {
                            log::debug!("{}: skipped ({:?})", record.code, reason);
                            summary.skipped += 1;
                        }
                    }
                }

                report.end_query()?;
            }

            on_term(term);
        }
    }

    Ok(summary)
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
