//! Account use-case service.
//!
//! # Responsibility
//! - Provide registration, lookup and role management entry points.
//! - Turn storage-level conflicts into actionable account errors so the UI
//!   can tell "email already registered" apart from "storage broke".
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Credentials are compared as stored; hashing is owned by the calling
//!   application, not silently added here.

use crate::model::user::{Role, User};
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

pub type AccountResult<T> = Result<T, AccountError>;

/// Errors surfaced by account use-cases.
#[derive(Debug)]
pub enum AccountError {
    /// The email is already registered. Recoverable; prompt for another.
    EmailTaken(String),
    /// The email does not look like an address at all.
    InvalidEmail(String),
    /// Underlying repository failure.
    Repo(RepoError),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailTaken(email) => write!(f, "email already registered: {email}"),
            Self::InvalidEmail(email) => write!(f, "not a valid email address: {email}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmailTaken(_) => None,
            Self::InvalidEmail(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for AccountError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper over any user repository implementation.
pub struct AccountService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new account.
    ///
    /// # Contract
    /// - The email must have a plausible address shape.
    /// - A duplicate email returns [`AccountError::EmailTaken`] and leaves
    ///   the table unchanged.
    pub fn register(&self, user: &User) -> AccountResult<i64> {
        if !EMAIL_RE.is_match(&user.email) {
            return Err(AccountError::InvalidEmail(user.email.clone()));
        }

        match self.repo.create_user(user) {
            Ok(id) => {
                info!("event=account_register module=service status=ok user_id={id}");
                Ok(id)
            }
            Err(RepoError::Conflict(_)) => Err(AccountError::EmailTaken(user.email.clone())),
            Err(other) => Err(AccountError::Repo(other)),
        }
    }

    pub fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.repo.find_by_email(email)
    }

    /// Looks up the account matching `email` + `password`.
    ///
    /// Comparison is against the stored opaque credential.
    pub fn verify_credentials(&self, email: &str, password: &str) -> RepoResult<Option<User>> {
        let user = self.repo.find_by_email(email)?;
        Ok(user.filter(|user| user.password == password))
    }

    /// Promotes or demotes an account to `role`.
    pub fn change_role(&self, id: i64, role: Role) -> RepoResult<()> {
        self.repo.update_role(id, role)?;
        info!("event=account_role module=service status=ok user_id={id}");
        Ok(())
    }
}
