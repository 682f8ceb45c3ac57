//! Core of the phonebook contact client.
//! Keeps an in-memory contact list consistent with a REST backend and owns
//! the session token lifecycle; rendering layers drive it.

pub mod app;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;

pub use app::{AppError, PhonebookApp};
pub use config::{ClientConfig, ConfigError};
pub use gateway::{AuthApi, ContactApi, Credentials, GatewayError, GatewayResult, HttpGateway};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{Contact, ContactFields, ContactId, ContactValidationError};
pub use service::auth_service::{AuthService, AuthServiceError};
pub use service::contact_list::{ContactListController, ContactListError, FilteredView};
pub use service::edit_session::{EditMode, EditSession, FormCoordinator, FormError};
pub use session::{
    BearerToken, MemorySessionStore, SessionError, SessionResult, SessionStore,
    SqliteSessionStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
