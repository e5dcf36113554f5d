//! Service request record.

use serde::{Deserialize, Serialize};

/// A roadside/home service request captured by the client app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Stable row id. `0` until persisted.
    pub id: i64,
    /// Requesting user, when the request was made from an account.
    pub user_id: Option<i64>,
    /// Requested service kind ("bateria", "grua", "mecanica general").
    pub kind: String,
    pub description: Option<String>,
    /// Where the service is needed.
    pub address: String,
    /// Epoch milliseconds, assigned once at capture.
    pub timestamp: i64,
    pub urgent: bool,
    pub needs_tow: bool,
}

impl ServiceRequest {
    pub fn new(kind: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: super::UNSAVED_ID,
            user_id: None,
            kind: kind.into(),
            description: None,
            address: address.into(),
            timestamp: super::now_epoch_ms(),
            urgent: false,
            needs_tow: false,
        }
    }
}
