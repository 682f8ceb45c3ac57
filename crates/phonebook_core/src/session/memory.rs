//! Process-local session store.

use super::{BearerToken, SessionError, SessionResult, SessionStore};
use std::sync::RwLock;

/// Non-durable store; the token lives as long as the value.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<BearerToken>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: BearerToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get_token(&self) -> SessionResult<Option<BearerToken>> {
        let guard = self.token.read().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.clone())
    }

    fn set_token(&self, token: &BearerToken) -> SessionResult<()> {
        let mut guard = self.token.write().map_err(|_| SessionError::Poisoned)?;
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear_token(&self) -> SessionResult<()> {
        let mut guard = self.token.write().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}
