//! Address repository: CRUD plus default selection for saved addresses.

use crate::db::{Database, Subscription};
use crate::model::address::Address;
use crate::repo::defaults::{DefaultManager, Defaultable};
use crate::repo::record::{flag_from_row, ConflictStrategy, Record, Store};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::Row;

impl Record for Address {
    const TABLE: &'static str = "addresses";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "name",
        "address",
        "city",
        "region",
        "postal_code",
        "latitude",
        "longitude",
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
            Value::from(self.name.clone()),
            Value::from(self.address.clone()),
            Value::from(self.city.clone()),
            Value::from(self.region.clone()),
            Value::from(self.postal_code.clone()),
            Value::from(self.latitude),
            Value::from(self.longitude),
            Value::from(self.is_default),
            Value::from(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            address: row.get("address")?,
            city: row.get("city")?,
            region: row.get("region")?,
            postal_code: row.get("postal_code")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            is_default: flag_from_row(row, "is_default")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl Defaultable for Address {
    const OWNER_COLUMN: &'static str = "user_id";
    const CREATED_COLUMN: &'static str = "created_at";

    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

/// SQLite-backed address repository.
pub struct SqliteAddressRepository<'db> {
    store: Store<'db, Address>,
    defaults: DefaultManager<'db, Address>,
}

impl<'db> SqliteAddressRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self {
            store: Store::new(db),
            defaults: DefaultManager::new(db),
        }
    }

    pub fn insert(&self, address: &Address) -> RepoResult<i64> {
        self.store.insert(address)
    }

    pub fn update(&self, address: &Address) -> RepoResult<()> {
        self.store.update(address)
    }

    pub fn delete_by_id(&self, id: i64) -> RepoResult<()> {
        self.store.delete_by_id(id)
    }

    pub fn get_by_id(&self, id: i64) -> RepoResult<Option<Address>> {
        self.store.get_by_id(id)
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.store.count()
    }

    /// See [`DefaultManager::set_as_default`].
    pub fn set_as_default(&self, user_id: i64, address_id: i64) -> RepoResult<()> {
        self.defaults.set_as_default(user_id, address_id)
    }

    pub fn get_default(&self, user_id: i64) -> RepoResult<Option<Address>> {
        self.defaults.get_default(user_id)
    }

    pub fn clear_default_for_user(&self, user_id: i64) -> RepoResult<()> {
        self.defaults.clear_default_for_user(user_id)
    }

    /// Default first, then newest first.
    pub fn list_for_user(&self, user_id: i64) -> RepoResult<Vec<Address>> {
        self.defaults.list_by_owner(user_id)
    }

    /// Live snapshot stream of [`SqliteAddressRepository::list_for_user`].
    pub fn watch_for_user(&self, user_id: i64) -> RepoResult<Subscription<Address>> {
        self.defaults.watch_by_owner(user_id)
    }
}
