//! Generic typed table store.
//!
//! # Responsibility
//! - Provide create/read/update/delete/count over any record type that maps
//!   to one table with an `i64 id` primary key.
//! - Apply each table's configured insert conflict policy.
//!
//! # Invariants
//! - Inserting a record whose id is the unsaved sentinel lets the store
//!   assign the next id; a caller-supplied id is honored as given.
//! - `update` of a missing id reports `NotFound` instead of silently
//!   succeeding.
//! - Deleting a missing id is a successful no-op.

use crate::db::Database;
use crate::model::UNSAVED_ID;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension, Row};
use std::marker::PhantomData;

/// Insert behavior when a key (primary or unique) already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictStrategy {
    /// Fail the insert with [`RepoError::Conflict`].
    Abort,
    /// Overwrite the existing row (upsert).
    Replace,
}

impl ConflictStrategy {
    fn insert_verb(self) -> &'static str {
        match self {
            Self::Abort => "INSERT",
            Self::Replace => "INSERT OR REPLACE",
        }
    }
}

/// A domain type persisted in one table, keyed by `id INTEGER PRIMARY KEY`.
pub trait Record: Sized {
    const TABLE: &'static str;
    /// Column names excluding `id`, in bind order.
    const COLUMNS: &'static [&'static str];
    /// Per-table insert conflict policy.
    const ON_CONFLICT: ConflictStrategy;

    fn id(&self) -> i64;
    /// Values for [`Record::COLUMNS`], in the same order.
    fn bind_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// `SELECT` projection shared by every read path of `T`.
pub(crate) fn select_sql<T: Record>() -> String {
    format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

/// Generic store over one record type.
///
/// Entity repositories wrap this for their table and add named queries on
/// top; nothing outside the repo layer builds SQL.
pub struct Store<'db, T: Record> {
    db: &'db Database,
    _record: PhantomData<fn() -> T>,
}

impl<'db, T: Record> Store<'db, T> {
    pub fn new(db: &'db Database) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    pub(crate) fn db(&self) -> &'db Database {
        self.db
    }

    /// Persists `record`, returning its id.
    ///
    /// The unsaved sentinel id is replaced by a store-assigned one;
    /// any other id is kept and resolved per [`Record::ON_CONFLICT`].
    pub fn insert(&self, record: &T) -> RepoResult<i64> {
        let id = {
            let conn = self.db.conn();
            let placeholders = (0..T::COLUMNS.len())
                .map(|index| format!("?{}", index + 2))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "{} INTO {} (id, {}) VALUES (?1, {placeholders});",
                T::ON_CONFLICT.insert_verb(),
                T::TABLE,
                T::COLUMNS.join(", "),
            );

            let id_value = match record.id() {
                UNSAVED_ID => Value::Null,
                id => Value::Integer(id),
            };
            let mut values = Vec::with_capacity(T::COLUMNS.len() + 1);
            values.push(id_value);
            values.extend(record.bind_values());

            conn.execute(&sql, params_from_iter(values))?;
            match record.id() {
                UNSAVED_ID => conn.last_insert_rowid(),
                id => id,
            }
        };

        self.db.invalidate(&[T::TABLE]);
        Ok(id)
    }

    /// Replaces the stored row matching the record's id.
    pub fn update(&self, record: &T) -> RepoResult<()> {
        let changed = {
            let conn = self.db.conn();
            let assignments = T::COLUMNS
                .iter()
                .enumerate()
                .map(|(index, column)| format!("{column} = ?{}", index + 2))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!("UPDATE {} SET {assignments} WHERE id = ?1;", T::TABLE);

            let mut values = Vec::with_capacity(T::COLUMNS.len() + 1);
            values.push(Value::Integer(record.id()));
            values.extend(record.bind_values());

            conn.execute(&sql, params_from_iter(values))?
        };

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: T::TABLE,
                id: record.id(),
            });
        }

        self.db.invalidate(&[T::TABLE]);
        Ok(())
    }

    pub fn delete(&self, record: &T) -> RepoResult<()> {
        self.delete_by_id(record.id())
    }

    /// Removes one row by id. Missing ids are a successful no-op.
    pub fn delete_by_id(&self, id: i64) -> RepoResult<()> {
        let changed = {
            let conn = self.db.conn();
            conn.execute(&format!("DELETE FROM {} WHERE id = ?1;", T::TABLE), [id])?
        };

        if changed > 0 {
            self.db.invalidate(&[T::TABLE]);
        }
        Ok(())
    }

    pub fn get_by_id(&self, id: i64) -> RepoResult<Option<T>> {
        let conn = self.db.conn();
        let sql = format!("{} WHERE id = ?1;", select_sql::<T>());
        let mut stmt = conn.prepare(&sql)?;
        let row = stmt
            .query_row([id], |row| Ok(T::from_row(row)))
            .optional()?;
        row.transpose()
    }

    pub fn count(&self) -> RepoResult<u64> {
        let conn = self.db.conn();
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", T::TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Lists every row ordered by the given `ORDER BY` body.
    pub fn list(&self, order_by: &str) -> RepoResult<Vec<T>> {
        let conn = self.db.conn();
        let sql = format!("{} ORDER BY {order_by};", select_sql::<T>());
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(T::from_row(row)?);
        }
        Ok(records)
    }
}

/// Reads a 0/1 flag column, rejecting any other persisted value.
pub(crate) fn flag_from_row(row: &Row<'_>, column: &'static str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in column `{column}`"
        ))),
    }
}
