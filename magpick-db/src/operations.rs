//! Write operations: record upserts and import tracking.

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use crate::export::ImportRecord;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

// ── Record Operations ───────────────────────────────────────────────────────

/// What an upsert did to the stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Insert or update a record and its actress credits.
pub fn upsert_record(
    conn: &Connection,
    record: &ImportRecord,
) -> Result<UpsertOutcome, OperationError> {
    let actress = record.actress_display();
    let magnets = record.links.to_json();

    let existing: Option<(String, String, Option<String>)> = conn
        .query_row(
            "SELECT title, actress, magnets FROM records WHERE code = ?1",
            params![record.code],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;

    let mut credits = record.actresses.clone();
    credits.sort();
    credits.dedup();

    let outcome = match existing {
        None => {
            conn.execute(
                "INSERT INTO records (code, title, actress, magnets) VALUES (?1, ?2, ?3, ?4)",
                params![record.code, record.title, actress, magnets],
            )?;
            UpsertOutcome::Created
        }
        Some((title, old_actress, old_magnets))
            if title == record.title
                && old_actress == actress
                && old_magnets == magnets
                && stored_credits(conn, &record.code)? == credits =>
        {
            return Ok(UpsertOutcome::Unchanged);
        }
        Some(_) => {
            conn.execute(
                "UPDATE records SET title = ?2, actress = ?3, magnets = ?4,
                     updated_at = datetime('now')
                 WHERE code = ?1",
                params![record.code, record.title, actress, magnets],
            )?;
            UpsertOutcome::Updated
        }
    };

    conn.execute(
        "DELETE FROM record_actresses WHERE code = ?1",
        params![record.code],
    )?;
    for name in &credits {
        conn.execute(
            "INSERT OR IGNORE INTO record_actresses (code, name) VALUES (?1, ?2)",
            params![record.code, name],
        )?;
    }

    Ok(outcome)
}

/// Credited names for `code`, sorted.
fn stored_credits(conn: &Connection, code: &str) -> Result<Vec<String>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT name FROM record_actresses WHERE code = ?1 ORDER BY name")?;
    let rows = stmt.query_map(params![code], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Counts from one import run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl ImportStats {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged
    }
}

/// Upsert a batch of records in a single transaction and log the import.
pub fn import_records(
    conn: &mut Connection,
    source_name: &str,
    records: &[ImportRecord],
) -> Result<ImportStats, OperationError> {
    let tx = conn.transaction()?;
    let mut stats = ImportStats::default();

    for record in records {
        match upsert_record(&tx, record)? {
            UpsertOutcome::Created => stats.created += 1,
            UpsertOutcome::Updated => stats.updated += 1,
            UpsertOutcome::Unchanged => stats.unchanged += 1,
        }
    }

    let log = ImportLog {
        id: 0,
        source_name: source_name.to_string(),
        imported_at: chrono::Utc::now().to_rfc3339(),
        records_created: stats.created as i64,
        records_updated: stats.updated as i64,
        records_unchanged: stats.unchanged as i64,
    };
    insert_import_log(&tx, &log)?;

    tx.commit()?;
    log::debug!(
        "Imported {} record(s) from {}: {} created, {} updated, {} unchanged",
        stats.total(),
        source_name,
        stats.created,
        stats.updated,
        stats.unchanged,
    );
    Ok(stats)
}

// ── Import Log ──────────────────────────────────────────────────────────────

/// An import run as recorded in `import_log`.
#[derive(Debug, Clone)]
pub struct ImportLog {
    pub id: i64,
    pub source_name: String,
    pub imported_at: String,
    pub records_created: i64,
    pub records_updated: i64,
    pub records_unchanged: i64,
}

/// Insert an import log entry.
pub fn insert_import_log(conn: &Connection, log: &ImportLog) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO import_log (source_name, imported_at,
             records_created, records_updated, records_unchanged)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            log.source_name,
            log.imported_at,
            log.records_created,
            log.records_updated,
            log.records_unchanged,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
