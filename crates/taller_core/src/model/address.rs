//! Saved address record.
//!
//! # Invariants
//! - At most one address per `user_id` carries `is_default = true` at any
//!   observable point; the repository layer owns that transition.
//! - `created_at` is set once at construction.

use serde::{Deserialize, Serialize};

/// A user-owned delivery/service address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Stable row id. `0` until persisted.
    pub id: i64,
    /// Owning user id.
    pub user_id: i64,
    /// Short label shown in pickers ("Casa", "Trabajo").
    pub name: String,
    /// Full street address text.
    pub address: String,
    pub city: String,
    pub region: String,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_default: bool,
    /// Epoch milliseconds, assigned once.
    pub created_at: i64,
}

impl Address {
    pub fn new(
        user_id: i64,
        name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            id: super::UNSAVED_ID,
            user_id,
            name: name.into(),
            address: address.into(),
            city: city.into(),
            region: region.into(),
            postal_code: None,
            latitude: None,
            longitude: None,
            is_default: false,
            created_at: super::now_epoch_ms(),
        }
    }
}
