//! Saved vehicle record.
//!
//! # Invariants
//! - At most one vehicle per `user_id` carries `is_default = true`; same
//!   single-default contract as addresses.
//! - `created_at` is set once at construction.

use serde::{Deserialize, Serialize};

/// A user-owned vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Stable row id. `0` until persisted.
    pub id: i64,
    /// Owning user id.
    pub user_id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub color: String,
    pub is_default: bool,
    /// Epoch milliseconds, assigned once.
    pub created_at: i64,
}

impl Vehicle {
    pub fn new(
        user_id: i64,
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        plate: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: super::UNSAVED_ID,
            user_id,
            brand: brand.into(),
            model: model.into(),
            year,
            plate: plate.into(),
            color: color.into(),
            is_default: false,
            created_at: super::now_epoch_ms(),
        }
    }
}
