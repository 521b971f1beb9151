use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Database file '{0}' not found")]
    Unavailable(String),

    #[error("{0}")]
    Query(#[from] rusqlite::Error),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Backing store the query tool reads from
///
/// Every call to [`DataSource::open`] hands out a fresh connection owned by
/// the caller; connections are never pooled or shared across calls.
pub trait DataSource: Send + Sync {
    fn open(&self) -> SourceResult<Connection>;

    /// Human-readable location, used in diagnostics
    fn describe(&self) -> String;
}

/// SQLite database file opened read-only
#[derive(Debug, Clone)]
pub struct SqliteFile {
    path: PathBuf,
}

impl SqliteFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for SqliteFile {
    fn open(&self) -> SourceResult<Connection> {
        if !self.path.exists() {
            return Err(SourceError::Unavailable(self.describe()));
        }
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Ok(Connection::open_with_flags(&self.path, flags)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
