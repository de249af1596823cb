//! SQLite persistence layer for catalog records.
//!
//! Provides schema creation, record import, the four record lookups and a
//! [`SqliteStore`] implementing `magpick_core::RecordStore`, backed by
//! SQLite (via rusqlite with bundled feature).

pub mod export;
pub mod operations;
pub mod queries;
pub mod schema;
pub mod store;

pub use export::{ExportError, ImportRecord, load_export, parse_export};
pub use operations::{
    ImportLog, ImportStats, OperationError, UpsertOutcome, import_records, insert_import_log,
    upsert_record,
};
pub use queries::{
    StoreStats, find_by_actress, find_by_code, find_by_series, find_by_title, list_import_logs,
    store_stats,
};
pub use schema::{SchemaError, open_database, open_memory};
pub use store::SqliteStore;
