//! Form/modal coordinator for add, edit and delete interactions.
//!
//! # Responsibility
//! - Own the ephemeral edit session (mode plus working field copy).
//! - Translate user intent into `ContactListController` calls.
//! - Hold the pending delete until the user confirms it.
//!
//! # Invariants
//! - The edit session is never persisted.
//! - Failures are recorded on the controller only; the form shows that single
//!   message while it is open.
//! - A failed submit leaves mode and fields untouched so the user can retry.

use crate::model::contact::{Contact, ContactFields, ContactId};
use crate::service::contact_list::{ContactListController, ContactListError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    None,
    Creating,
    Editing(ContactId),
}

/// Transient state of an in-progress add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    pub mode: EditMode,
    pub fields: ContactFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// `submit` was called without an open form.
    NothingToSubmit,
    /// `confirm_delete` was called without a pending delete.
    NothingToDelete,
    List(ContactListError),
}

impl FormError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::List(err) if err.is_auth())
    }
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingToSubmit => write!(f, "no contact form is open"),
            Self::NothingToDelete => write!(f, "no contact is awaiting delete confirmation"),
            Self::List(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::List(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContactListError> for FormError {
    fn from(value: ContactListError) -> Self {
        Self::List(value)
    }
}

#[derive(Debug, Default)]
pub struct FormCoordinator {
    session: EditSession,
    pending_delete: Option<Contact>,
}

impl FormCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_add(&mut self) {
        self.session = EditSession {
            mode: EditMode::Creating,
            fields: ContactFields::default(),
        };
    }

    pub fn open_edit(&mut self, contact: &Contact) {
        self.session = EditSession {
            mode: EditMode::Editing(contact.id.clone()),
            fields: contact.fields(),
        };
    }

    /// Closes the form and discards the working copy.
    pub fn cancel(&mut self) {
        self.session = EditSession::default();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.session.fields.name = name.into();
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.session.fields.phone = phone.into();
    }

    pub fn mode(&self) -> &EditMode {
        &self.session.mode
    }

    pub fn fields(&self) -> &ContactFields {
        &self.session.fields
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        self.session.mode != EditMode::None
    }

    /// The controller's active error while a form or delete prompt is open.
    pub fn error_message(&self, controller: &ContactListController) -> Option<String> {
        if self.is_open() || self.pending_delete.is_some() {
            controller.error_message()
        } else {
            None
        }
    }

    /// Sends the working copy to the controller.
    ///
    /// Creating calls `add`, editing calls `update`. On success the session is
    /// closed; on failure it stays as-is.
    pub async fn submit(
        &mut self,
        controller: &ContactListController,
    ) -> Result<Contact, FormError> {
        let ContactFields { name, phone } = &self.session.fields;
        let result = match &self.session.mode {
            EditMode::None => return Err(FormError::NothingToSubmit),
            EditMode::Creating => controller.add(name, phone).await,
            EditMode::Editing(id) => controller.update(id, name, phone).await,
        };

        let contact = result?;
        self.session = EditSession::default();
        Ok(contact)
    }

    /// Asks for confirmation before deleting `contact`.
    pub fn request_delete(&mut self, contact: &Contact) {
        self.pending_delete = Some(contact.clone());
    }

    pub fn pending_delete(&self) -> Option<&Contact> {
        self.pending_delete.as_ref()
    }

    pub fn dismiss_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the contact awaiting confirmation.
    ///
    /// The pending entry is kept on failure so the user can retry.
    pub async fn confirm_delete(
        &mut self,
        controller: &ContactListController,
    ) -> Result<ContactId, FormError> {
        let id = match &self.pending_delete {
            Some(contact) => contact.id.clone(),
            None => return Err(FormError::NothingToDelete),
        };

        controller.remove(&id).await?;
        self.pending_delete = None;
        Ok(id)
    }

    /// Closes every open interaction.
    pub fn reset(&mut self) {
        self.cancel();
        self.pending_delete = None;
    }
}
