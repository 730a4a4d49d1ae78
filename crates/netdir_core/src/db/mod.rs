//! Local directory cache: connection bootstrap, schema and lifecycle.
//!
//! The cache holds three tables:
//! - `people`: one row per Person id; employers, education and tags are
//!   JSON array columns.
//! - `companies`: one row per Company id plus a `normalized_name` column.
//!   It is indexed but not unique: duplicates written by racing writers
//!   stay until the dedup sweep collapses them.
//! - `relationship_edges`: keyed by the sorted endpoint pair, both endpoints
//!   referencing `people` with `ON DELETE CASCADE`.
//!
//! # Invariants
//! - Every connection handed out has `foreign_keys=ON` and is migrated to
//!   [`migrations::latest_version`]; repositories refuse anything else.
//! - A database written by a newer binary is rejected, never downgraded.
//! - [`LocalCache`] is the only owner of a connection; there is no
//!   process-wide cache.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod cache;
pub mod migrations;
mod open;

pub use cache::LocalCache;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
