//! Service request repository.

use crate::db::Database;
use crate::model::service_request::ServiceRequest;
use crate::repo::record::{flag_from_row, select_sql, ConflictStrategy, Record, Store};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::Row;

impl Record for ServiceRequest {
    const TABLE: &'static str = "service_requests";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "kind",
        "description",
        "address",
        "timestamp",
        "urgent",
        "needs_tow",
    ];
    const ON_CONFLICT: ConflictStrategy = ConflictStrategy::Replace;

    fn id(&self) -> i64 {
        self.id
    }

    fn bind_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.user_id),
            Value::from(self.kind.clone()),
            Value::from(self.description.clone()),
            Value::from(self.address.clone()),
            Value::from(self.timestamp),
            Value::from(self.urgent),
            Value::from(self.needs_tow),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            kind: row.get("kind")?,
            description: row.get("description")?,
            address: row.get("address")?,
            timestamp: row.get("timestamp")?,
            urgent: flag_from_row(row, "urgent")?,
            needs_tow: flag_from_row(row, "needs_tow")?,
        })
    }
}

/// SQLite-backed service request repository.
pub struct SqliteServiceRequestRepository<'db> {
    store: Store<'db, ServiceRequest>,
}

impl<'db> SqliteServiceRequestRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self {
            store: Store::new(db),
        }
    }

    pub fn insert(&self, request: &ServiceRequest) -> RepoResult<i64> {
        self.store.insert(request)
    }

    pub fn delete_by_id(&self, id: i64) -> RepoResult<()> {
        self.store.delete_by_id(id)
    }

    pub fn get_by_id(&self, id: i64) -> RepoResult<Option<ServiceRequest>> {
        self.store.get_by_id(id)
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.store.count()
    }

    /// Every captured request, newest first.
    pub fn list_recent(&self) -> RepoResult<Vec<ServiceRequest>> {
        self.store.list("timestamp DESC, id DESC")
    }

    /// One requester's history, newest first.
    pub fn list_for_user(&self, user_id: i64) -> RepoResult<Vec<ServiceRequest>> {
        let conn = self.store.db().conn();
        let sql = format!(
            "{} WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC;",
            select_sql::<ServiceRequest>()
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([user_id])?;

        let mut requests = Vec::new();
        while let Some(row) = rows.next()? {
            requests.push(ServiceRequest::from_row(row)?);
        }
        Ok(requests)
    }
}
