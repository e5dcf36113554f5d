//! SQLite storage bootstrap, schema migration and lifecycle entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the core.
//! - Apply schema migrations in deterministic order.
//! - Own the process-wide storage handle and its one-time seed step.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations
//!   succeed.
//! - Exactly one `Database` exists per `DbManager`, no matter how many
//!   callers race the first open.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod lifecycle;
pub mod migrations;
mod open;
pub mod watch;

pub use lifecycle::{Database, DbManager, LifecycleState};
pub use watch::Subscription;

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
