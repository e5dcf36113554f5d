//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the account CRUD surface consumed by registration and role
//!   management.
//! - Keep the unique-email policy observable: duplicate inserts abort with
//!   a conflict instead of overwriting.
//!
//! # Invariants
//! - `users` inserts use ABORT conflict semantics; every other table in
//!   this store upserts.
//! - Deleting a user does not cascade to addresses/vehicles/requests; the
//!   owned rows stay behind with a dangling `user_id`. Known, documented
//!   limitation of the storage layer.

use crate::db::Database;
use crate::model::user::{Role, User};
use crate::repo::record::{ConflictStrategy, Record, Store};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension, Row};

/// Account data access contract.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<i64>;
    fn update_user(&self, user: &User) -> RepoResult<()>;
    fn get_user(&self, id: i64) -> RepoResult<Option<User>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    fn update_role(&self, id: i64, role: Role) -> RepoResult<()>;
    fn delete_user(&self, id: i64) -> RepoResult<()>;
    fn count_users(&self) -> RepoResult<u64>;
}

impl Record for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["name", "email", "phone", "password", "role"];
    const ON_CONFLICT: ConflictStrategy = ConflictStrategy::Abort;

    fn id(&self) -> i64 {
        self.id
    }

    fn bind_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.name.clone()),
            Value::from(self.email.clone()),
            Value::from(self.phone.clone()),
            Value::from(self.password.clone()),
            Value::from(role_to_db(self.role).to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let role_text: String = row.get("role")?;
        let role = parse_role(&role_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid role `{role_text}` in users.role"))
        })?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            password: row.get("password")?,
            role,
        })
    }
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'db> {
    store: Store<'db, User>,
}

impl<'db> SqliteUserRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self {
            store: Store::new(db),
        }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<i64> {
        self.store.insert(user)
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        self.store.update(user)
    }

    fn get_user(&self, id: i64) -> RepoResult<Option<User>> {
        self.store.get_by_id(id)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let conn = self.store.db().conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, phone, password, role
             FROM users
             WHERE email = ?1;",
        )?;
        let row = stmt
            .query_row([email], |row| Ok(User::from_row(row)))
            .optional()?;
        row.transpose()
    }

    /// Targeted field update for role promotion/demotion.
    fn update_role(&self, id: i64, role: Role) -> RepoResult<()> {
        let changed = {
            let conn = self.store.db().conn();
            conn.execute(
                "UPDATE users SET role = ?2 WHERE id = ?1;",
                params![id, role_to_db(role)],
            )?
        };

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: User::TABLE,
                id,
            });
        }

        self.store.db().invalidate(&[User::TABLE]);
        Ok(())
    }

    fn delete_user(&self, id: i64) -> RepoResult<()> {
        self.store.delete_by_id(id)
    }

    fn count_users(&self) -> RepoResult<u64> {
        self.store.count()
    }
}

fn role_to_db(role: Role) -> &'static str {
    match role {
        Role::Client => "client",
        Role::Mechanic => "mechanic",
        Role::Admin => "admin",
    }
}

fn parse_role(value: &str) -> Option<Role> {
    match value {
        "client" => Some(Role::Client),
        "mechanic" => Some(Role::Mechanic),
        "admin" => Some(Role::Admin),
        _ => None,
    }
}
