//! [`RecordStore`] backed by a SQLite connection.

use std::path::Path;

use magpick_core::{Record, RecordStore};
use rusqlite::Connection;

use crate::operations::OperationError;
use crate::queries;
use crate::schema::{self, SchemaError};

/// A record store over an open catalog database.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, SchemaError> {
        Ok(Self::new(schema::open_database(path)?))
    }

    /// An empty in-memory store.
    pub fn in_memory() -> Result<Self, SchemaError> {
        Ok(Self::new(schema::open_memory()?))
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl RecordStore for SqliteStore {
    type Error = OperationError;

    fn find_by_code(&self, code: &str) -> Result<Vec<Record>, Self::Error> {
        queries::find_by_code(&self.conn, code)
    }

    fn find_by_series(&self, prefix: &str) -> Result<Vec<Record>, Self::Error> {
        queries::find_by_series(&self.conn, prefix)
    }

    fn find_by_title(&self, keyword: &str) -> Result<Vec<Record>, Self::Error> {
        queries::find_by_title(&self.conn, keyword)
    }

    fn find_by_actress(&self, name: &str) -> Result<Vec<Record>, Self::Error> {
        queries::find_by_actress(&self.conn, name)
    }
}
