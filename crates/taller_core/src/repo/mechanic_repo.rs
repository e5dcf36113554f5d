//! Mechanic directory repository.
//!
//! Mechanic ids come from the catalog that publishes the directory, so
//! inserts are idempotent upserts keyed by that external id.

use crate::db::{Database, Subscription};
use crate::model::mechanic::Mechanic;
use crate::model::UNSAVED_ID;
use crate::repo::record::{flag_from_row, select_sql, ConflictStrategy, Record, Store};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, Row};

impl Record for Mechanic {
    const TABLE: &'static str = "mechanics";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "specialty",
        "rating",
        "distance",
        "phone",
        "is_available",
        "address",
        "experience",
        "price_per_hour",
        "profile_image",
    ];
    const ON_CONFLICT: ConflictStrategy = ConflictStrategy::Replace;

    fn id(&self) -> i64 {
        self.id
    }

    fn bind_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.name.clone()),
            Value::from(self.specialty.clone()),
            Value::from(self.rating),
            Value::from(self.distance.clone()),
            Value::from(self.phone.clone()),
            Value::from(self.is_available),
            Value::from(self.address.clone()),
            Value::from(i64::from(self.experience)),
            Value::from(self.price_per_hour),
            Value::from(self.profile_image.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            specialty: row.get("specialty")?,
            rating: row.get("rating")?,
            distance: row.get("distance")?,
            phone: row.get("phone")?,
            is_available: flag_from_row(row, "is_available")?,
            address: row.get("address")?,
            experience: row.get("experience")?,
            price_per_hour: row.get("price_per_hour")?,
            profile_image: row.get("profile_image")?,
        })
    }
}

/// SQLite-backed mechanic repository.
pub struct SqliteMechanicRepository<'db> {
    store: Store<'db, Mechanic>,
}

impl<'db> SqliteMechanicRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self {
            store: Store::new(db),
        }
    }

    /// Inserts or replaces the directory entry for the mechanic's id.
    ///
    /// # Errors
    /// [`RepoError::Validation`] when the id is unassigned: this store never
    /// invents mechanic ids.
    pub fn upsert(&self, mechanic: &Mechanic) -> RepoResult<i64> {
        if mechanic.id == UNSAVED_ID {
            return Err(RepoError::Validation(
                "mechanic id must be assigned by the catalog, not the store".to_string(),
            ));
        }
        self.store.insert(mechanic)
    }

    pub fn delete_by_id(&self, id: i64) -> RepoResult<()> {
        self.store.delete_by_id(id)
    }

    pub fn get_by_id(&self, id: i64) -> RepoResult<Option<Mechanic>> {
        self.store.get_by_id(id)
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.store.count()
    }

    /// Full directory, best-rated first.
    pub fn list_all(&self) -> RepoResult<Vec<Mechanic>> {
        self.store.list("rating DESC, id ASC")
    }

    /// Directory filtered to mechanics currently taking work.
    pub fn list_available(&self) -> RepoResult<Vec<Mechanic>> {
        let conn = self.store.db().conn();
        let sql = format!(
            "{} WHERE is_available = 1 ORDER BY rating DESC, id ASC;",
            select_sql::<Mechanic>()
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let mut mechanics = Vec::new();
        while let Some(row) = rows.next()? {
            mechanics.push(Mechanic::from_row(row)?);
        }
        Ok(mechanics)
    }

    /// Targeted availability toggle.
    pub fn set_availability(&self, id: i64, is_available: bool) -> RepoResult<()> {
        let changed = {
            let conn = self.store.db().conn();
            conn.execute(
                "UPDATE mechanics SET is_available = ?2 WHERE id = ?1;",
                params![id, is_available],
            )?
        };

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: Mechanic::TABLE,
                id,
            });
        }

        self.store.db().invalidate(&[Mechanic::TABLE]);
        Ok(())
    }

    /// Live snapshot stream of the full directory, best-rated first.
    pub fn watch_all(&self) -> RepoResult<Subscription<Mechanic>> {
        self.store.db().subscribe(&[Mechanic::TABLE], |db| {
            let store: Store<'_, Mechanic> = Store::new(db);
            store.list("rating DESC, id ASC")
        })
    }
}
