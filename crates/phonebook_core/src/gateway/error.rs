use crate::model::contact::ContactId;
use crate::session::SessionError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Classified failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Missing, expired or invalid token; callers force a logout.
    Auth,
    /// Payload rejected by the server.
    Validation(String),
    /// Target contact no longer exists server-side.
    NotFound(ContactId),
    /// Email already registered.
    Conflict(String),
    InvalidCredentials,
    /// Transport or connectivity failure.
    Network(String),
    /// Non-success status outside the documented set.
    UnexpectedStatus { status: u16, message: String },
    /// Success status with a body that could not be decoded.
    InvalidResponse(String),
    /// Token could not be read from the session store.
    Session(String),
}

impl GatewayError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Network(_) => "network",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Session(_) => "session",
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth)
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth => write!(f, "session expired, please log in again"),
            Self::Validation(message) => write!(f, "rejected by server: {message}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::Conflict(message) => write!(f, "already registered: {message}"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::Network(message) => write!(f, "network error: {message}"),
            Self::UnexpectedStatus { status, message } => {
                write!(f, "unexpected server response {status}: {message}")
            }
            Self::InvalidResponse(message) => write!(f, "invalid server response: {message}"),
            Self::Session(message) => write!(f, "session unavailable: {message}"),
        }
    }
}

impl Error for GatewayError {}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::InvalidResponse(value.to_string())
        } else {
            Self::Network(value.to_string())
        }
    }
}

impl From<SessionError> for GatewayError {
    fn from(value: SessionError) -> Self {
        Self::Session(value.to_string())
    }
}
