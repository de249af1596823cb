//! Read queries for the record database.
//!
//! All lookups return records in insertion order.

use magpick_core::{LinkField, Record};
use rusqlite::{Connection, params};
use serde_json::Value;

use crate::operations::{ImportLog, OperationError};

const RECORD_COLUMNS: &str = "r.code, r.title, r.actress, r.magnets";

// ── Record Lookups ──────────────────────────────────────────────────────────

/// Find records by exact code.
pub fn find_by_code(conn: &Connection, code: &str) -> Result<Vec<Record>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM records r WHERE r.code = ?1 ORDER BY r.rowid"
    ))?;
    let rows = stmt.query_map(params![code], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Find records whose code starts with `prefix` (case-insensitive).
pub fn find_by_series(conn: &Connection, prefix: &str) -> Result<Vec<Record>, OperationError> {
    let pattern = format!("{}%", escape_like(prefix));
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM records r
         WHERE r.code LIKE ?1 ESCAPE '\\' ORDER BY r.rowid"
    ))?;
    let rows = stmt.query_map(params![pattern], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Find records whose title contains `keyword` (case-insensitive).
pub fn find_by_title(conn: &Connection, keyword: &str) -> Result<Vec<Record>, OperationError> {
    let pattern = format!("%{}%", escape_like(keyword));
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM records r
         WHERE r.title LIKE ?1 ESCAPE '\\' ORDER BY r.rowid"
    ))?;
    let rows = stmt.query_map(params![pattern], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Find records crediting an actress by exact name.
pub fn find_by_actress(conn: &Connection, name: &str) -> Result<Vec<Record>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM records r
         WHERE r.code IN (SELECT code FROM record_actresses WHERE name = ?1)
         ORDER BY r.rowid"
    ))?;
    let rows = stmt.query_map(params![name], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Summary statistics for the record store.
#[derive(Debug, Default)]
pub struct StoreStats {
    pub records: i64,
    pub with_links: i64,
    pub without_links: i64,
    pub actresses: i64,
    pub imports: i64,
}

/// Count records, link coverage, distinct actresses and imports.
pub fn store_stats(conn: &Connection) -> Result<StoreStats, OperationError> {
    let records: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))?;
    let without_links: i64 = conn.query_row(
        "SELECT COUNT(*) FROM records WHERE magnets IS NULL",
        [],
        |r| r.get(0),
    )?;
    let actresses: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT name) FROM record_actresses",
        [],
        |r| r.get(0),
    )?;
    let imports: i64 = conn.query_row("SELECT COUNT(*) FROM import_log", [], |r| r.get(0))?;

    Ok(StoreStats {
        records,
        with_links: records - without_links,
        without_links,
        actresses,
        imports,
    })
}

/// List recent import log entries, newest first.
pub fn list_import_logs(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<ImportLog>, OperationError> {
    let limit = limit.unwrap_or(20);
    let mut stmt = conn.prepare(&format!(
        "SELECT id, source_name, imported_at,
                records_created, records_updated, records_unchanged
         FROM import_log ORDER BY imported_at DESC, id DESC LIMIT {limit}"
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(ImportLog {
            id: row.get(0)?,
            source_name: row.get(1)?,
            imported_at: row.get(2)?,
            records_created: row.get(3)?,
            records_updated: row.get(4)?,
            records_unchanged: row.get(5)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let magnets: Option<String> = row.get(3)?;
    Ok(Record {
        code: row.get(0)?,
        title: row.get(1)?,
        actress: row.get(2)?,
        links: parse_links(magnets),
    })
}

/// Classify the stored link column. Text that is not JSON is kept raw.
fn parse_links(magnets: Option<String>) -> LinkField {
    match magnets {
        None => LinkField::Missing,
        Some(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => LinkField::from_json(Some(value)),
            Err(_) => LinkField::Malformed(Value::String(text)),
        },
    }
}
