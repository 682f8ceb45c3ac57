//! Remote store contracts and their HTTP implementation.
//!
//! # Responsibility
//! - Translate domain operations into calls against the contacts backend.
//! - Classify every failure into one `GatewayError` kind.
//!
//! # Invariants
//! - Gateways never recover errors; they propagate the classified kind.
//! - Gateways never mutate the session store or any contact collection.

mod error;
mod http;

pub use error::{GatewayError, GatewayResult};
pub use http::HttpGateway;

use crate::model::contact::{Contact, ContactFields, ContactId};
use crate::session::BearerToken;
use async_trait::async_trait;
use serde::Serialize;

/// Login/signup payload.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Contact operations against the remote store.
#[async_trait]
pub trait ContactApi: Send + Sync {
    async fn list_contacts(&self) -> GatewayResult<Vec<Contact>>;
    async fn create_contact(&self, fields: &ContactFields) -> GatewayResult<Contact>;
    async fn update_contact(&self, id: &ContactId, fields: &ContactFields)
        -> GatewayResult<Contact>;
    async fn delete_contact(&self, id: &ContactId) -> GatewayResult<()>;
}

/// Account operations that mint a bearer token.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> GatewayResult<BearerToken>;
    async fn signup(&self, credentials: &Credentials) -> GatewayResult<BearerToken>;
}
