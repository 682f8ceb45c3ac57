//! SQLite-backed durable session store.
//!
//! # Invariants
//! - The token occupies exactly one row keyed by `TOKEN_KEY`.
//! - Writes replace the row; clears delete it.

use super::{BearerToken, SessionError, SessionResult, SessionStore};
use crate::db::{open_db, open_db_in_memory};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const TOKEN_KEY: &str = "auth_token";

/// Durable session store persisted in a SQLite file.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Opens the store at `path`, creating and migrating the file as needed.
    pub fn open(path: impl AsRef<Path>) -> SessionResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a store that lives only as long as this value.
    pub fn open_in_memory() -> SessionResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> SessionResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| SessionError::Poisoned)
    }
}

impl SessionStore for SqliteSessionStore {
    fn get_token(&self) -> SessionResult<Option<BearerToken>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM session_kv WHERE key = ?1;",
                [TOKEN_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value.map(BearerToken::new))
    }

    fn set_token(&self, token: &BearerToken) -> SessionResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO session_kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![TOKEN_KEY, token.expose()],
        )?;
        info!("event=session_set module=session status=ok");
        Ok(())
    }

    fn clear_token(&self) -> SessionResult<()> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM session_kv WHERE key = ?1;", [TOKEN_KEY])?;
        info!("event=session_clear module=session status=ok removed={removed}");
        Ok(())
    }
}
