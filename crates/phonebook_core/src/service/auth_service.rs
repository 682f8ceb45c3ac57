//! Session lifecycle use-cases.
//!
//! # Responsibility
//! - Exchange credentials for a token and persist it.
//! - Clear the token on logout and on forced logout after an auth failure.
//!
//! # Invariants
//! - This is the only writer of the session store.
//! - A failed login/signup leaves any existing token untouched.

use crate::gateway::{AuthApi, Credentials, GatewayError};
use crate::session::{SessionError, SessionStore};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug)]
pub enum AuthServiceError {
    /// Email or password was blank; no request was sent.
    MissingCredentials,
    Gateway(GatewayError),
    Session(SessionError),
}

impl Display for AuthServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "email and password are required"),
            Self::Gateway(err) => write!(f, "{err}"),
            Self::Session(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingCredentials => None,
            Self::Gateway(err) => Some(err),
            Self::Session(err) => Some(err),
        }
    }
}

impl From<GatewayError> for AuthServiceError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<SessionError> for AuthServiceError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

pub struct AuthService {
    api: Arc<dyn AuthApi>,
    session: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthServiceError> {
        let credentials = credentials(email, password)?;
        let token = self.api.login(&credentials).await?;
        self.session.set_token(&token)?;
        info!("event=auth_login module=service status=ok");
        Ok(())
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<(), AuthServiceError> {
        let credentials = credentials(email, password)?;
        let token = self.api.signup(&credentials).await?;
        self.session.set_token(&token)?;
        info!("event=auth_signup module=service status=ok");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AuthServiceError> {
        self.session.clear_token()?;
        info!("event=auth_logout module=service status=ok reason=user");
        Ok(())
    }

    /// Clears the token after the server rejected it.
    pub fn handle_auth_failure(&self) -> Result<(), AuthServiceError> {
        self.session.clear_token()?;
        warn!("event=auth_logout module=service status=ok reason=token_rejected");
        Ok(())
    }

    pub fn is_authenticated(&self) -> Result<bool, AuthServiceError> {
        Ok(self.session.has_token()?)
    }
}

fn credentials(email: &str, password: &str) -> Result<Credentials, AuthServiceError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthServiceError::MissingCredentials);
    }
    Ok(Credentials::new(email, password))
}
