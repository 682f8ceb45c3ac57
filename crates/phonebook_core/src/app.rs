//! Application facade wiring session, gateway and services together.
//!
//! # Responsibility
//! - Build the component graph from `ClientConfig` or injected parts.
//! - Route every rejected-token error to a forced logout.
//!
//! # Invariants
//! - After logout (user or forced) no contacts and no open form remain.

use crate::config::ClientConfig;
use crate::gateway::{AuthApi, ContactApi, GatewayError, HttpGateway};
use crate::model::contact::{Contact, ContactId};
use crate::service::auth_service::{AuthService, AuthServiceError};
use crate::service::contact_list::{ContactListController, ContactListError};
use crate::service::edit_session::{FormCoordinator, FormError};
use crate::session::{SessionError, SessionStore, SqliteSessionStore};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug)]
pub enum AppError {
    Session(SessionError),
    Gateway(GatewayError),
    Auth(AuthServiceError),
    List(ContactListError),
    Form(FormError),
    UnknownContact(ContactId),
}

impl AppError {
    /// Whether the server rejected the session token.
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Gateway(err) => err.is_auth(),
            Self::Auth(AuthServiceError::Gateway(err)) => err.is_auth(),
            Self::List(err) => err.is_auth(),
            Self::Form(err) => err.is_auth(),
            _ => false,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Session(err) => write!(f, "{err}"),
            Self::Gateway(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::List(err) => write!(f, "{err}"),
            Self::Form(err) => write!(f, "{err}"),
            Self::UnknownContact(id) => write!(f, "no contact with id {id}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Session(err) => Some(err),
            Self::Gateway(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::List(err) => Some(err),
            Self::Form(err) => Some(err),
            Self::UnknownContact(_) => None,
        }
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<GatewayError> for AppError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<AuthServiceError> for AppError {
    fn from(value: AuthServiceError) -> Self {
        Self::Auth(value)
    }
}

impl From<ContactListError> for AppError {
    fn from(value: ContactListError) -> Self {
        Self::List(value)
    }
}

impl From<FormError> for AppError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

pub struct PhonebookApp {
    auth: AuthService,
    contacts: ContactListController,
    editor: FormCoordinator,
}

impl PhonebookApp {
    /// Opens the durable session store and HTTP gateway described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        let session: Arc<dyn SessionStore> =
            Arc::new(SqliteSessionStore::open(&config.session_db_path)?);
        let gateway = Arc::new(HttpGateway::from_config(config, Arc::clone(&session))?);
        Ok(Self::with_parts(session, gateway.clone(), gateway))
    }

    pub fn with_parts(
        session: Arc<dyn SessionStore>,
        auth_api: Arc<dyn AuthApi>,
        contact_api: Arc<dyn ContactApi>,
    ) -> Self {
        Self {
            auth: AuthService::new(auth_api, session),
            contacts: ContactListController::new(contact_api),
            editor: FormCoordinator::new(),
        }
    }

    pub fn contacts(&self) -> &ContactListController {
        &self.contacts
    }

    pub fn editor(&self) -> &FormCoordinator {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut FormCoordinator {
        &mut self.editor
    }

    /// The single active error message, shared by the list and the form.
    pub fn error_message(&self) -> Option<String> {
        self.contacts.error_message()
    }

    pub fn is_authenticated(&self) -> Result<bool, AppError> {
        Ok(self.auth.is_authenticated()?)
    }

    /// Starts a session and loads the contact collection.
    ///
    /// A failed initial load does not fail the login. Its message stays on the
    /// list controller, and a rejected token still ends the session.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), AppError> {
        self.auth.login(email, password).await?;
        self.clear_local_state();
        self.load_after_sign_in().await;
        Ok(())
    }

    /// Creates an account, starts its session and loads the contact collection.
    pub async fn signup(&mut self, email: &str, password: &str) -> Result<(), AppError> {
        self.auth.signup(email, password).await?;
        self.clear_local_state();
        self.load_after_sign_in().await;
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), AppError> {
        self.clear_local_state();
        self.auth.logout()?;
        Ok(())
    }

    pub async fn refresh(&mut self) -> Result<usize, AppError> {
        let result = self.contacts.refresh().await.map_err(AppError::from);
        self.after(result)
    }

    pub async fn submit_form(&mut self) -> Result<Contact, AppError> {
        let result = self
            .editor
            .submit(&self.contacts)
            .await
            .map_err(AppError::from);
        self.after(result)
    }

    /// Opens the edit form for a contact held in the collection.
    pub fn open_edit(&mut self, id: &ContactId) -> Result<(), AppError> {
        let contact = self
            .contacts
            .get(id)
            .ok_or_else(|| AppError::UnknownContact(id.clone()))?;
        self.editor.open_edit(&contact);
        Ok(())
    }

    /// Marks a contact held in the collection for deletion.
    pub fn request_delete(&mut self, id: &ContactId) -> Result<(), AppError> {
        let contact = self
            .contacts
            .get(id)
            .ok_or_else(|| AppError::UnknownContact(id.clone()))?;
        self.editor.request_delete(&contact);
        Ok(())
    }

    pub async fn confirm_delete(&mut self) -> Result<ContactId, AppError> {
        let result = self
            .editor
            .confirm_delete(&self.contacts)
            .await
            .map_err(AppError::from);
        self.after(result)
    }

    async fn load_after_sign_in(&mut self) {
        if let Err(err) = self.refresh().await {
            warn!(
                "event=initial_refresh module=app status=error auth_rejected={} error={err}",
                err.is_auth()
            );
        }
    }

    fn after<T>(&mut self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(err) = &result {
            if err.is_auth() {
                self.force_logout();
            }
        }
        result
    }

    fn force_logout(&mut self) {
        self.clear_local_state();
        if let Err(err) = self.auth.handle_auth_failure() {
            warn!("event=auth_logout module=app status=error reason=token_rejected error={err}");
        }
    }

    fn clear_local_state(&mut self) {
        self.contacts.reset();
        self.editor.reset();
    }
}
