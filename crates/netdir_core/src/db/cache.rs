//! Local cache handle.
//!
//! # Invariants
//! - Exactly one connection per handle; repositories borrow it.
//! - `close` is the explicit teardown and reports flush failures.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Explicit owner of the local directory cache.
///
/// Passed by reference into services instead of living in process-wide
/// state.
#[derive(Debug)]
pub struct LocalCache {
    conn: Connection,
    path: Option<PathBuf>,
}

impl LocalCache {
    /// Opens (and migrates) a file-backed cache.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_db(&path)?;
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Opens an in-memory cache, used by tests and one-shot tools.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
            path: None,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// File path, `None` for in-memory caches.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Closes the underlying connection.
    pub fn close(self) -> DbResult<()> {
        let mode = if self.path.is_some() { "file" } else { "memory" };
        match self.conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok mode={mode}");
                Ok(())
            }
            Err((_conn, err)) => {
                error!("event=db_close module=db status=error mode={mode} error={err}");
                Err(DbError::Sqlite(err))
            }
        }
    }
}
