//! Core persistence layer for the Taller client application.
//! This crate is the single source of truth for storage invariants:
//! one default address/vehicle per user, unique account emails, and a
//! storage handle that is opened exactly once per process.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{Database, DbError, DbManager, DbResult, LifecycleState, Subscription};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::address::Address;
pub use model::mechanic::Mechanic;
pub use model::service_request::ServiceRequest;
pub use model::user::{Role, User};
pub use model::vehicle::Vehicle;
pub use model::UNSAVED_ID;
pub use repo::address_repo::SqliteAddressRepository;
pub use repo::defaults::{DefaultManager, Defaultable};
pub use repo::mechanic_repo::SqliteMechanicRepository;
pub use repo::record::{ConflictStrategy, Record, Store};
pub use repo::request_repo::SqliteServiceRequestRepository;
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::vehicle_repo::SqliteVehicleRepository;
pub use repo::{RepoError, RepoResult};
pub use service::account_service::{AccountError, AccountResult, AccountService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
