//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taller_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use taller_core::{Database, SqliteMechanicRepository, SqliteUserRepository, UserRepository};

fn main() {
    println!("taller_core version={}", taller_core::core_version());

    // In-memory probe: bootstrap, migrate and seed without touching disk.
    match Database::open_in_memory() {
        Ok(db) => {
            let users = SqliteUserRepository::new(&db);
            let mechanics = SqliteMechanicRepository::new(&db);
            println!(
                "taller_core probe users={} mechanics={}",
                users.count_users().unwrap_or(0),
                mechanics.count().unwrap_or(0)
            );
        }
        Err(err) => {
            eprintln!("taller_core probe failed: {err}");
            std::process::exit(1);
        }
    }
}
