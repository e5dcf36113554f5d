//! Single-default selection over owner-scoped collections.
//!
//! # Responsibility
//! - Guarantee that each owner has at most one record flagged default in a
//!   defaultable table (addresses, vehicles).
//! - Serve the owner-facing ordering contract: default first, then newest.
//!
//! # Invariants
//! - `set_as_default` clears and sets inside one immediate transaction on
//!   the single writer connection: no reader observes zero or two defaults,
//!   and two racing setters for the same owner serialize (last committed
//!   wins).
//! - A target record not owned by the given owner fails validation with no
//!   rows mutated.

use crate::db::{Database, Subscription};
use crate::repo::record::{select_sql, Record};
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{OptionalExtension, Transaction, TransactionBehavior};
use std::marker::PhantomData;

/// A [`Record`] scoped to an owning user and carrying a default flag.
///
/// Implementing tables must expose `is_default` plus the owner and creation
/// columns named here.
pub trait Defaultable: Record {
    const OWNER_COLUMN: &'static str;
    const CREATED_COLUMN: &'static str;

    fn owner_id(&self) -> i64;
    fn is_default(&self) -> bool;
}

/// Default-selection operations for one defaultable table.
pub struct DefaultManager<'db, T: Defaultable> {
    db: &'db Database,
    _record: PhantomData<fn() -> T>,
}

impl<'db, T: Defaultable> DefaultManager<'db, T> {
    pub fn new(db: &'db Database) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    /// Makes `record_id` the single default for `owner_id`.
    ///
    /// # Errors
    /// - [`RepoError::NotFound`] when `record_id` does not exist.
    /// - [`RepoError::Validation`] when it exists but belongs to another
    ///   owner. Neither case mutates any row.
    pub fn set_as_default(&self, owner_id: i64, record_id: i64) -> RepoResult<()> {
        {
            let conn = self.db.conn();
            let tx = Transaction::new_unchecked(&conn, TransactionBehavior::Immediate)?;

            let owner: Option<i64> = tx
                .query_row(
                    &format!(
                        "SELECT {} FROM {} WHERE id = ?1;",
                        T::OWNER_COLUMN,
                        T::TABLE
                    ),
                    [record_id],
                    |row| row.get(0),
                )
                .optional()?;
            let owner = owner.ok_or(RepoError::NotFound {
                table: T::TABLE,
                id: record_id,
            })?;
            if owner != owner_id {
                return Err(RepoError::Validation(format!(
                    "row {record_id} in `{}` belongs to user {owner}, not user {owner_id}",
                    T::TABLE
                )));
            }

            tx.execute(
                &format!(
                    "UPDATE {} SET is_default = 0 WHERE {} = ?1;",
                    T::TABLE,
                    T::OWNER_COLUMN
                ),
                [owner_id],
            )?;
            tx.execute(
                &format!("UPDATE {} SET is_default = 1 WHERE id = ?1;", T::TABLE),
                [record_id],
            )?;
            tx.commit()?;
        }

        debug!(
            "event=default_set module=repo status=ok table={} owner_id={owner_id} record_id={record_id}",
            T::TABLE
        );
        self.db.invalidate(&[T::TABLE]);
        Ok(())
    }

    /// Returns the owner's current default, if one is flagged.
    ///
    /// Absence is a legitimate state (owner has no records, or none chosen
    /// yet), never an error.
    pub fn get_default(&self, owner_id: i64) -> RepoResult<Option<T>> {
        let conn = self.db.conn();
        let sql = format!(
            "{} WHERE {} = ?1 AND is_default = 1 LIMIT 1;",
            select_sql::<T>(),
            T::OWNER_COLUMN
        );
        let mut stmt = conn.prepare(&sql)?;
        let row = stmt
            .query_row([owner_id], |row| Ok(T::from_row(row)))
            .optional()?;
        row.transpose()
    }

    /// Clears the default flag on all of the owner's records without
    /// choosing a new one.
    pub fn clear_default_for_user(&self, owner_id: i64) -> RepoResult<()> {
        let changed = {
            let conn = self.db.conn();
            conn.execute(
                &format!(
                    "UPDATE {} SET is_default = 0 WHERE {} = ?1;",
                    T::TABLE,
                    T::OWNER_COLUMN
                ),
                [owner_id],
            )?
        };

        if changed > 0 {
            self.db.invalidate(&[T::TABLE]);
        }
        Ok(())
    }

    /// Lists the owner's records: default first, then newest-created first.
    ///
    /// The ordering is a user-facing contract (most relevant item first);
    /// id descending breaks creation-time ties deterministically.
    pub fn list_by_owner(&self, owner_id: i64) -> RepoResult<Vec<T>> {
        snapshot_by_owner::<T>(self.db, owner_id)
    }

    /// Live variant of [`DefaultManager::list_by_owner`]: pushes a fresh
    /// snapshot after every committed write to the table.
    pub fn watch_by_owner(&self, owner_id: i64) -> RepoResult<Subscription<T>>
    where
        T: Send + 'static,
    {
        self.db
            .subscribe(&[T::TABLE], move |db| snapshot_by_owner::<T>(db, owner_id))
    }
}

fn snapshot_by_owner<T: Defaultable>(db: &Database, owner_id: i64) -> RepoResult<Vec<T>> {
    let conn = db.conn();
    let sql = format!(
        "{} WHERE {} = ?1 ORDER BY is_default DESC, {} DESC, id DESC;",
        select_sql::<T>(),
        T::OWNER_COLUMN,
        T::CREATED_COLUMN
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([owner_id])?;

    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(T::from_row(row)?);
    }
    Ok(records)
}
