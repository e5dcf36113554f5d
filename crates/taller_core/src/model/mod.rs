//! Domain records persisted by the core.
//!
//! # Responsibility
//! - Define the canonical data structures shared by repository and service
//!   layers.
//! - Assign creation timestamps exactly once, at construction.
//!
//! # Invariants
//! - Every record is identified by a stable `i64` id; `0` means "not yet
//!   persisted" and is replaced on insert.
//! - `created_at` / `timestamp` fields are epoch milliseconds and are never
//!   touched by update paths.

use std::time::{SystemTime, UNIX_EPOCH};

pub mod address;
pub mod mechanic;
pub mod service_request;
pub mod user;
pub mod vehicle;

/// Identifier sentinel for records that have not been persisted yet.
pub const UNSAVED_ID: i64 = 0;

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
