//! Repository layer: typed table stores and owner-scoped default selection.
//!
//! # Responsibility
//! - Define the data access contracts consumed by services and the client
//!   application.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`Conflict`, `Validation`,
//!   `NotFound`) in addition to DB transport errors, so callers can branch
//!   on recoverable conditions.
//! - Every successful mutation notifies the watch hub for its table.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod address_repo;
pub mod defaults;
pub mod mechanic_repo;
pub mod record;
pub mod request_repo;
pub mod user_repo;
pub mod vehicle_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error taxonomy shared by all repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Engine/I/O failure. Fatal for the current operation, safe to retry.
    Storage(DbError),
    /// Unique-constraint violation (e.g. duplicate email). Recoverable;
    /// the caller should prompt for different input.
    Conflict(String),
    /// The operation referenced a record in a way the domain forbids
    /// (e.g. setting a default the owner does not own). Nothing was mutated.
    Validation(String),
    /// The operation referenced an id that does not exist.
    NotFound { table: &'static str, id: i64 },
    /// Persisted state cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Conflict(message) => write!(f, "constraint conflict: {message}"),
            Self::Validation(message) => write!(f, "{message}"),
            Self::NotFound { table, id } => write!(f, "no row with id {id} in `{table}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Conflict(_) => None,
            Self::Validation(_) => None,
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Unique/constraint failures are a distinct recoverable class;
            // everything else is transport.
            rusqlite::Error::SqliteFailure(err, message)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Conflict(message.unwrap_or_else(|| err.to_string()))
            }
            other => Self::Storage(DbError::Sqlite(other)),
        }
    }
}
