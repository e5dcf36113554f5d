//! Storage handle ownership and one-time bootstrap.
//!
//! # Responsibility
//! - Own the single shared connection behind [`Database`].
//! - Drive the `Uninitialized -> Initializing -> Ready` open protocol so
//!   racing early callers all receive the same handle.
//! - Apply idempotent seed data on a freshly created store.
//!
//! # Invariants
//! - All mutation goes through the connection mutex; no caller ever gets
//!   unguarded access to raw storage.
//! - The seed step runs on the connection being opened (the raw path) and
//!   never re-enters the public accessor, so bootstrap cannot recurse.
//! - Seed failure after a successful schema bootstrap is reported in the
//!   log, not escalated: schema readiness and seed success are independent
//!   outcomes.

use super::open;
use super::watch::WatchHub;
use super::DbResult;
use log::{error, info};
use once_cell::sync::OnceCell;
use rusqlite::{params, Connection, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to one open store.
///
/// Cheap to share via `Arc`; all repositories borrow it. Construction is
/// explicit — application composition decides where the handle lives and
/// passes it down instead of reaching into global state.
pub struct Database {
    conn: Mutex<Connection>,
    watch: WatchHub,
}

impl Database {
    /// Opens (and creates if missing) a file-backed store, then applies the
    /// seed step.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let mut conn = open::open_file(path)?;
        run_seed(&mut conn);
        Ok(Self::from_conn(conn))
    }

    /// Opens a fresh in-memory store, then applies the seed step.
    pub fn open_in_memory() -> DbResult<Self> {
        let mut conn = open::open_memory()?;
        run_seed(&mut conn);
        Ok(Self::from_conn(conn))
    }

    fn from_conn(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            watch: WatchHub::new(),
        }
    }

    /// Exclusive access to the underlying connection.
    ///
    /// Mutation paths must release this guard before notifying watchers.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another writer panicked; the connection
        // itself is still consistent (transactions rolled back on unwind).
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-delivers snapshots to every subscription watching `tables`.
    pub(crate) fn invalidate(&self, tables: &[&str]) {
        self.watch.notify(self, tables);
    }

    pub(crate) fn watch_hub(&self) -> &WatchHub {
        &self.watch
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

/// Bootstrap progress of a [`DbManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
}

/// Initialize-or-wait guard around one [`Database`] handle.
///
/// The first caller of [`DbManager::get_or_open`] performs the open;
/// concurrent callers block until it finishes and then receive the same
/// `Arc`. A failed open leaves the manager `Uninitialized` so a later call
/// can retry — dependent operations stay unavailable until one succeeds.
pub struct DbManager {
    handle: OnceCell<Arc<Database>>,
    state: Mutex<LifecycleState>,
}

impl DbManager {
    pub fn new() -> Self {
        Self {
            handle: OnceCell::new(),
            state: Mutex::new(LifecycleState::Uninitialized),
        }
    }

    /// Returns the shared handle, opening the store on first use.
    pub fn get_or_open(&self, path: impl AsRef<Path>) -> DbResult<Arc<Database>> {
        let path = path.as_ref();
        self.init_with(|| Database::open(path))
    }

    /// In-memory variant of [`DbManager::get_or_open`].
    pub fn get_or_open_in_memory(&self) -> DbResult<Arc<Database>> {
        self.init_with(Database::open_in_memory)
    }

    fn init_with(&self, open: impl FnOnce() -> DbResult<Database>) -> DbResult<Arc<Database>> {
        let handle = self.handle.get_or_try_init(|| {
            self.set_state(LifecycleState::Initializing);
            info!("event=db_lifecycle module=db status=start");
            match open() {
                Ok(db) => {
                    self.set_state(LifecycleState::Ready);
                    info!("event=db_lifecycle module=db status=ok");
                    Ok(Arc::new(db))
                }
                Err(err) => {
                    self.set_state(LifecycleState::Uninitialized);
                    error!(
                        "event=db_lifecycle module=db status=error error_code=db_init_failed error={err}"
                    );
                    Err(err)
                }
            }
        })?;
        Ok(Arc::clone(handle))
    }

    /// Returns the handle when the manager is `Ready`.
    pub fn get(&self) -> Option<Arc<Database>> {
        self.handle.get().cloned()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: LifecycleState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

impl Default for DbManager {
    fn default() -> Self {
        Self::new()
    }
}

fn run_seed(conn: &mut Connection) {
    match seed_defaults(conn) {
        Ok((users, mechanics)) => {
            info!("event=db_seed module=db status=ok users={users} mechanics={mechanics}");
        }
        Err(err) => {
            error!("event=db_seed module=db status=error error_code=db_seed_failed error={err}");
        }
    }
}

/// Inserts the fixed starter rows when their tables are empty.
///
/// The empty-check and the inserts share one immediate transaction, so two
/// processes racing the first open cannot both seed.
fn seed_defaults(conn: &mut Connection) -> DbResult<(u32, u32)> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut users = 0u32;
    let user_count: i64 = tx.query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?;
    if user_count == 0 {
        for (name, email, phone, password, role) in SEED_USERS {
            tx.execute(
                "INSERT INTO users (name, email, phone, password, role)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![name, email, phone, password, role],
            )?;
            users += 1;
        }
    }

    let mut mechanics = 0u32;
    let mechanic_count: i64 =
        tx.query_row("SELECT COUNT(*) FROM mechanics;", [], |row| row.get(0))?;
    if mechanic_count == 0 {
        for seed in SEED_MECHANICS {
            tx.execute(
                "INSERT OR REPLACE INTO mechanics (
                    id, name, specialty, rating, distance, phone,
                    is_available, address, experience, price_per_hour
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
                params![
                    seed.id,
                    seed.name,
                    seed.specialty,
                    seed.rating,
                    seed.distance,
                    seed.phone,
                    seed.available,
                    seed.address,
                    seed.experience,
                    seed.price_per_hour,
                ],
            )?;
            mechanics += 1;
        }
    }

    tx.commit()?;
    Ok((users, mechanics))
}

const SEED_USERS: &[(&str, &str, &str, &str, &str)] = &[
    ("Admin", "admin@taller.com", "999000111", "admin123", "admin"),
    ("Jose", "jose@gmail.com", "987654321", "123456", "client"),
];

struct MechanicSeed {
    id: i64,
    name: &'static str,
    specialty: &'static str,
    rating: f64,
    distance: &'static str,
    phone: &'static str,
    available: bool,
    address: &'static str,
    experience: i32,
    price_per_hour: f64,
}

const SEED_MECHANICS: &[MechanicSeed] = &[
    MechanicSeed {
        id: 1,
        name: "Carlos Ramirez",
        specialty: "Motor y transmision",
        rating: 4.8,
        distance: "2.5 km",
        phone: "987111222",
        available: true,
        address: "Av. Los Incas 120",
        experience: 12,
        price_per_hour: 80.0,
    },
    MechanicSeed {
        id: 2,
        name: "Luis Fernandez",
        specialty: "Sistema electrico",
        rating: 4.6,
        distance: "3.1 km",
        phone: "987333444",
        available: true,
        address: "Jr. Ayacucho 455",
        experience: 8,
        price_per_hour: 70.0,
    },
    MechanicSeed {
        id: 3,
        name: "Miguel Torres",
        specialty: "Frenos y suspension",
        rating: 4.9,
        distance: "1.8 km",
        phone: "987555666",
        available: false,
        address: "Calle Bolivar 89",
        experience: 15,
        price_per_hour: 90.0,
    },
    MechanicSeed {
        id: 4,
        name: "Ana Castillo",
        specialty: "Diagnostico computarizado",
        rating: 4.7,
        distance: "4.0 km",
        phone: "987777888",
        available: true,
        address: "Av. Grau 310",
        experience: 6,
        price_per_hour: 85.0,
    },
];
