//! Vehicle repository: CRUD plus default selection for the user's garage.

use crate::db::{Database, Subscription};
use crate::model::vehicle::Vehicle;
use crate::repo::defaults::{DefaultManager, Defaultable};
use crate::repo::record::{flag_from_row, ConflictStrategy, Record, Store};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::Row;

impl Record for Vehicle {
    const TABLE: &'static str = "vehicles";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "brand",
        "model",
        "year",
        "plate",
        "color",
        "is_default",
        "created_at",
    ];
    const ON_CONFLICT: ConflictStrategy = ConflictStrategy::Replace;

    fn id(&self) -> i64 {
        self.id
    }

    fn bind_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.user_id),
            Value::from(self.brand.clone()),
            Value::from(self.model.clone()),
            Value::from(i64::from(self.year)),
            Value::from(self.plate.clone()),
            Value::from(self.color.clone()),
            Value::from(self.is_default),
            Value::from(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            brand: row.get("brand")?,
            model: row.get("model")?,
            year: row.get("year")?,
            plate: row.get("plate")?,
            color: row.get("color")?,
            is_default: flag_from_row(row, "is_default")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl Defaultable for Vehicle {
    const OWNER_COLUMN: &'static str = "user_id";
    const CREATED_COLUMN: &'static str = "created_at";

    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

/// SQLite-backed vehicle repository.
pub struct SqliteVehicleRepository<'db> {
    store: Store<'db, Vehicle>,
    defaults: DefaultManager<'db, Vehicle>,
}

impl<'db> SqliteVehicleRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self {
            store: Store::new(db),
            defaults: DefaultManager::new(db),
        }
    }

    pub fn insert(&self, vehicle: &Vehicle) -> RepoResult<i64> {
        self.store.insert(vehicle)
    }

    pub fn update(&self, vehicle: &Vehicle) -> RepoResult<()> {
        self.store.update(vehicle)
    }

    pub fn delete_by_id(&self, id: i64) -> RepoResult<()> {
        self.store.delete_by_id(id)
    }

    pub fn get_by_id(&self, id: i64) -> RepoResult<Option<Vehicle>> {
        self.store.get_by_id(id)
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.store.count()
    }

    /// See [`DefaultManager::set_as_default`].
    pub fn set_as_default(&self, user_id: i64, vehicle_id: i64) -> RepoResult<()> {
        self.defaults.set_as_default(user_id, vehicle_id)
    }

    pub fn get_default(&self, user_id: i64) -> RepoResult<Option<Vehicle>> {
        self.defaults.get_default(user_id)
    }

    pub fn clear_default_for_user(&self, user_id: i64) -> RepoResult<()> {
        self.defaults.clear_default_for_user(user_id)
    }

    /// Default first, then newest first.
    pub fn list_for_user(&self, user_id: i64) -> RepoResult<Vec<Vehicle>> {
        self.defaults.list_by_owner(user_id)
    }

    /// Live snapshot stream of [`SqliteVehicleRepository::list_for_user`].
    pub fn watch_for_user(&self, user_id: i64) -> RepoResult<Subscription<Vehicle>> {
        self.defaults.watch_by_owner(user_id)
    }
}
