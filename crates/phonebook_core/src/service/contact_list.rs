//! Contact list controller.
//!
//! # Responsibility
//! - Own the canonical in-memory contact collection.
//! - Route every write through `ContactApi` and patch the collection by id
//!   only after the server confirmed it.
//! - Derive the filtered view shown to the user.
//!
//! # Invariants
//! - Ids are unique within the collection; insertion order is preserved.
//! - A failed operation never mutates the collection.
//! - At most one error message is active; each attempt clears the previous one.
//! - Results that arrive after `reset()` are discarded.

use crate::gateway::{ContactApi, GatewayError, GatewayResult};
use crate::model::contact::{Contact, ContactFields, ContactId, ContactValidationError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Failure of a controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactListError {
    /// Local validation short-circuited the call.
    Validation(ContactValidationError),
    Gateway(GatewayError),
    /// The controller was reset while the request was in flight.
    Superseded,
}

impl ContactListError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Gateway(err) if err.is_auth())
    }
}

impl Display for ContactListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Gateway(err) => write!(f, "{err}"),
            Self::Superseded => write!(f, "result discarded after reset"),
        }
    }
}

impl Error for ContactListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Gateway(err) => Some(err),
            Self::Superseded => None,
        }
    }
}

impl From<ContactValidationError> for ContactListError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

#[derive(Default)]
struct ListState {
    contacts: Arc<Vec<Contact>>,
    error: Option<String>,
    generation: u64,
}

/// Single source of truth for the contact collection.
pub struct ContactListController {
    api: Arc<dyn ContactApi>,
    state: Mutex<ListState>,
}

impl ContactListController {
    pub fn new(api: Arc<dyn ContactApi>) -> Self {
        Self {
            api,
            state: Mutex::new(ListState::default()),
        }
    }

    /// Replaces the whole collection with the server's list.
    ///
    /// Returns the number of contacts now held.
    pub async fn refresh(&self) -> Result<usize, ContactListError> {
        let generation = self.begin();
        let result = self.api.list_contacts().await;
        self.settle("refresh", generation, result, |contacts, listed| {
            *contacts = listed;
            contacts.len()
        })
    }

    /// Creates a contact and appends the server's record.
    pub async fn add(&self, name: &str, phone: &str) -> Result<Contact, ContactListError> {
        let generation = self.begin();
        let fields = self.validated(ContactFields::new(name, phone))?;
        let result = self.api.create_contact(&fields).await;
        self.settle("add", generation, result, |contacts, created| {
            match contacts.iter_mut().find(|existing| existing.id == created.id) {
                // A refresh that landed first may already hold this id.
                Some(existing) => *existing = created.clone(),
                None => contacts.push(created.clone()),
            }
            created
        })
    }

    /// Updates a contact and replaces the matching entry by id.
    pub async fn update(
        &self,
        id: &ContactId,
        name: &str,
        phone: &str,
    ) -> Result<Contact, ContactListError> {
        let generation = self.begin();
        let fields = self.validated(ContactFields::new(name, phone))?;
        let result = self.api.update_contact(id, &fields).await;
        self.settle("update", generation, result, |contacts, updated| {
            match contacts.iter_mut().find(|existing| &existing.id == id) {
                Some(existing) => *existing = updated.clone(),
                None => warn!(
                    "event=contacts_update module=service status=ok detail=target_missing_locally"
                ),
            }
            updated
        })
    }

    /// Deletes a contact and drops the matching entry.
    ///
    /// Confirmation is the caller's job; see `FormCoordinator::confirm_delete`.
    pub async fn remove(&self, id: &ContactId) -> Result<(), ContactListError> {
        let generation = self.begin();
        let result = self.api.delete_contact(id).await;
        self.settle("remove", generation, result, |contacts, ()| {
            let before = contacts.len();
            contacts.retain(|existing| &existing.id != id);
            if before == contacts.len() {
                warn!(
                    "event=contacts_remove module=service status=ok detail=target_missing_locally"
                );
            }
        })
    }

    /// Contacts whose name or phone contains `term`, case-insensitively.
    ///
    /// An empty term yields the whole collection in order.
    pub fn filtered_view(&self, term: &str) -> FilteredView {
        FilteredView {
            contacts: Arc::clone(&self.lock().contacts),
            needle: term.to_lowercase(),
        }
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.lock().contacts.as_ref().clone()
    }

    pub fn get(&self, id: &ContactId) -> Option<Contact> {
        self.lock()
            .contacts
            .iter()
            .find(|contact| &contact.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn error_message(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    /// Drops all local state and invalidates in-flight operations.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.contacts = Arc::new(Vec::new());
        state.error = None;
        debug!(
            "event=contacts_reset module=service status=ok generation={}",
            state.generation
        );
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        // State is only written under the lock in non-panicking sections.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> u64 {
        let mut state = self.lock();
        state.error = None;
        state.generation
    }

    fn validated(&self, fields: ContactFields) -> Result<ContactFields, ContactListError> {
        if let Err(err) = fields.validate() {
            self.lock().error = Some(err.to_string());
            debug!("event=contacts_validate module=service status=rejected reason={err:?}");
            return Err(err.into());
        }
        Ok(fields.trimmed())
    }

    fn settle<T, R>(
        &self,
        operation: &'static str,
        generation: u64,
        result: GatewayResult<T>,
        apply: impl FnOnce(&mut Vec<Contact>, T) -> R,
    ) -> Result<R, ContactListError> {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(
                "event=contacts_{operation} module=service status=discarded reason=stale_generation"
            );
            return Err(ContactListError::Superseded);
        }

        match result {
            Ok(value) => {
                let output = apply(Arc::make_mut(&mut state.contacts), value);
                info!(
                    "event=contacts_{operation} module=service status=ok count={}",
                    state.contacts.len()
                );
                Ok(output)
            }
            Err(err) => {
                warn!(
                    "event=contacts_{operation} module=service status=error error_code={}",
                    err.code()
                );
                state.error = Some(err.to_string());
                Err(ContactListError::Gateway(err))
            }
        }
    }
}

/// Lazily filtered snapshot of the collection.
///
/// Iteration can be restarted any number of times; later controller writes
/// do not affect an existing view.
#[derive(Debug, Clone)]
pub struct FilteredView {
    contacts: Arc<Vec<Contact>>,
    needle: String,
}

impl FilteredView {
    pub fn iter(&self) -> FilteredIter<'_> {
        FilteredIter {
            inner: self.contacts.iter(),
            needle: self.needle.as_str(),
        }
    }

    pub fn to_vec(&self) -> Vec<Contact> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a FilteredView {
    type Item = &'a Contact;
    type IntoIter = FilteredIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct FilteredIter<'a> {
    inner: std::slice::Iter<'a, Contact>,
    needle: &'a str,
}

impl<'a> Iterator for FilteredIter<'a> {
    type Item = &'a Contact;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle;
        self.inner
            .by_ref()
            .find(|contact| contact.matches_lowercase(needle))
    }
}
