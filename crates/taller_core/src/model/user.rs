//! User account record.
//!
//! # Responsibility
//! - Define the account shape shared by registration and role management.
//!
//! # Invariants
//! - `email` is unique across all users; the store rejects duplicates
//!   instead of overwriting.
//! - `password` is an opaque credential stored as given. Hashing is a known
//!   gap owned by the calling application, not silently added here.

use serde::{Deserialize, Serialize};

/// Access level attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer account. The default for new registrations.
    Client,
    /// Service-provider account.
    Mechanic,
    /// Administrative account.
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::Client
    }
}

/// Account record backing registration, login and role checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable row id. `0` until persisted.
    pub id: i64,
    pub name: String,
    /// Unique, case-sensitive login key.
    pub email: String,
    pub phone: String,
    /// Opaque credential, stored as given.
    pub password: String,
    pub role: Role,
}

impl User {
    /// Creates an unsaved user with the default `Client` role.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: super::UNSAVED_ID,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            password: password.into(),
            role: Role::default(),
        }
    }

    /// Creates an unsaved user with an explicit role.
    pub fn with_role(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        let mut user = Self::new(name, email, phone, password);
        user.role = role;
        user
    }
}
