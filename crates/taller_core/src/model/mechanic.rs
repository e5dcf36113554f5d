//! Mechanic directory record.
//!
//! Mechanic ids are assigned by the catalog that publishes them, never by
//! this store; re-inserting an id replaces the previous fields (idempotent
//! upsert).

use serde::{Deserialize, Serialize};

/// A mechanic listed in the in-app directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mechanic {
    /// Externally assigned id; must be non-zero.
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub rating: f64,
    /// Human-readable distance label ("2.5 km").
    pub distance: String,
    pub phone: String,
    pub is_available: bool,
    pub address: String,
    /// Years of experience.
    pub experience: i32,
    pub price_per_hour: f64,
    pub profile_image: Option<String>,
}
