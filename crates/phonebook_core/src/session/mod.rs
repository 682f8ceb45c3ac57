//! Session store: the authenticated user's bearer token.
//!
//! # Responsibility
//! - Hold the current token and expose presence/absence to gate access.
//! - Persist the token across restarts until explicitly cleared.
//!
//! # Invariants
//! - Stores perform no network I/O.
//! - Token values never reach log output; `BearerToken` redacts itself.
//! - After `clear_token()`, `get_token()` returns `None`.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

pub type SessionResult<T> = Result<T, SessionError>;

/// Opaque bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw token text, for header construction and persistence only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Failure of the durable backing storage.
#[derive(Debug)]
pub enum SessionError {
    Db(DbError),
    /// Backing state was poisoned by a panicking writer.
    Poisoned,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "session storage failed: {err}"),
            Self::Poisoned => write!(f, "session storage is unavailable after a panic"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Poisoned => None,
        }
    }
}

impl From<DbError> for SessionError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SessionError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for the session token.
///
/// Shared as `Arc<dyn SessionStore>`: the gateway only reads, session
/// lifecycle actions (login/signup/logout) only write.
pub trait SessionStore: Send + Sync {
    fn get_token(&self) -> SessionResult<Option<BearerToken>>;
    fn set_token(&self, token: &BearerToken) -> SessionResult<()>;
    fn clear_token(&self) -> SessionResult<()>;

    /// Returns whether a token is currently stored.
    fn has_token(&self) -> SessionResult<bool> {
        Ok(self.get_token()?.is_some())
    }
}
