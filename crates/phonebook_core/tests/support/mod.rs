#![allow(dead_code)]

use async_trait::async_trait;
use phonebook_core::{
    AuthApi, BearerToken, Contact, ContactApi, ContactFields, ContactId, Credentials,
    GatewayError, GatewayResult,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Default)]
struct FakeState {
    contacts: Vec<Contact>,
    next_id: u64,
    calls: usize,
    fail_next: Option<GatewayError>,
    create_delays: HashMap<String, Duration>,
    list_delay: Option<Duration>,
}

/// In-memory stand-in for the contacts backend.
#[derive(Default)]
pub struct FakeContactApi {
    state: Mutex<FakeState>,
}

impl FakeContactApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let next_id = contacts.len() as u64;
        Self {
            state: Mutex::new(FakeState {
                contacts,
                next_id,
                ..FakeState::default()
            }),
        }
    }

    /// Makes the next call fail with `err`.
    pub fn fail_next(&self, err: GatewayError) {
        self.lock().fail_next = Some(err);
    }

    /// Delays the server-side create of a contact named `name`.
    pub fn delay_create(&self, name: &str, delay: Duration) {
        self.lock().create_delays.insert(name.to_string(), delay);
    }

    pub fn delay_list(&self, delay: Duration) {
        self.lock().list_delay = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    pub fn server_contacts(&self) -> Vec<Contact> {
        self.lock().contacts.clone()
    }

    /// Mutates server state without going through the client.
    pub fn insert_remote(&self, contact: Contact) {
        self.lock().contacts.push(contact);
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn start_call(&self) -> GatewayResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContactApi for FakeContactApi {
    async fn list_contacts(&self) -> GatewayResult<Vec<Contact>> {
        self.start_call()?;
        let delay = self.lock().list_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.server_contacts())
    }

    async fn create_contact(&self, fields: &ContactFields) -> GatewayResult<Contact> {
        self.start_call()?;
        let delay = self.lock().create_delays.get(&fields.name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        state.next_id += 1;
        let contact = Contact::new(
            format!("srv-{}", state.next_id),
            fields.name.clone(),
            fields.phone.clone(),
        );
        state.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update_contact(
        &self,
        id: &ContactId,
        fields: &ContactFields,
    ) -> GatewayResult<Contact> {
        self.start_call()?;
        let mut state = self.lock();
        let existing = state
            .contacts
            .iter_mut()
            .find(|contact| &contact.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        existing.name = fields.name.clone();
        existing.phone = fields.phone.clone();
        Ok(existing.clone())
    }

    async fn delete_contact(&self, id: &ContactId) -> GatewayResult<()> {
        self.start_call()?;
        let mut state = self.lock();
        let before = state.contacts.len();
        state.contacts.retain(|contact| &contact.id != id);
        if state.contacts.len() == before {
            return Err(GatewayError::NotFound(id.clone()));
        }
        Ok(())
    }
}

/// In-memory account registry issuing `token-<email>` tokens.
#[derive(Default)]
pub struct FakeAuthApi {
    accounts: Mutex<HashMap<String, String>>,
}

impl FakeAuthApi {
    pub fn with_account(email: &str, password: &str) -> Self {
        let api = Self::default();
        api.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        api
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, credentials: &Credentials) -> GatewayResult<BearerToken> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(&credentials.email) {
            Some(password) if password == &credentials.password => {
                Ok(BearerToken::new(format!("token-{}", credentials.email)))
            }
            _ => Err(GatewayError::InvalidCredentials),
        }
    }

    async fn signup(&self, credentials: &Credentials) -> GatewayResult<BearerToken> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&credentials.email) {
            return Err(GatewayError::Conflict(credentials.email.clone()));
        }
        accounts.insert(credentials.email.clone(), credentials.password.clone());
        Ok(BearerToken::new(format!("token-{}", credentials.email)))
    }
}

pub fn sample_contacts() -> Vec<Contact> {
    vec![
        Contact::new("1", "Ann Lee", "555-1111"),
        Contact::new("2", "Bob", "555-2222"),
    ]
}
