//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its editable field set.
//! - Provide local non-empty validation used before any remote write.
//!
//! # Invariants
//! - `id` is opaque; the wire form may be a JSON string or integer.
//! - `name` and `phone` are non-empty after trimming.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque identifier assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ContactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match WireId::deserialize(deserializer)? {
            WireId::Text(value) => Self(value),
            WireId::Signed(value) => Self(value.to_string()),
            WireId::Unsigned(value) => Self(value.to_string()),
        })
    }
}

/// Server-confirmed contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
}

impl Contact {
    pub fn new(
        id: impl Into<ContactId>,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Returns the editable fields of this contact.
    pub fn fields(&self) -> ContactFields {
        ContactFields::new(self.name.clone(), self.phone.clone())
    }

    /// Case-insensitive substring match on `name` or `phone`.
    ///
    /// `needle` must already be lowercased; an empty needle matches everything.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle) || self.phone.to_lowercase().contains(needle)
    }
}

/// Editable field set used for create/update payloads and form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub phone: String,
}

impl ContactFields {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Validates local invariants before a remote write.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is empty or whitespace-only.
    /// - `EmptyPhone` when `phone` is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        if self.phone.trim().is_empty() {
            return Err(ContactValidationError::EmptyPhone);
        }
        Ok(())
    }

    /// Returns a copy with surrounding whitespace removed, as sent on the wire.
    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.phone.trim())
    }
}

/// Local validation failure for contact fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyName,
    EmptyPhone,
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyPhone => write!(f, "phone must not be empty"),
        }
    }
}

impl Error for ContactValidationError {}

#[cfg(test)]
mod tests {
    use super::{Contact, ContactFields, ContactId, ContactValidationError};

    #[test]
    fn validate_rejects_blank_fields() {
        assert_eq!(
            ContactFields::new("", "123").validate(),
            Err(ContactValidationError::EmptyName)
        );
        assert_eq!(
            ContactFields::new("Ann", "   ").validate(),
            Err(ContactValidationError::EmptyPhone)
        );
        assert!(ContactFields::new("Ann", "555").validate().is_ok());
    }

    #[test]
    fn id_accepts_string_and_integer_wire_forms() {
        let text: Contact =
            serde_json::from_str(r#"{"id":"a1","name":"Ann","phone":"1"}"#).unwrap();
        let number: Contact =
            serde_json::from_str(r#"{"id":42,"name":"Bob","phone":"2"}"#).unwrap();
        assert_eq!(text.id, ContactId::new("a1"));
        assert_eq!(number.id, ContactId::new("42"));
    }

    #[test]
    fn matches_lowercase_checks_name_and_phone() {
        let contact = Contact::new("1", "Ann Lee", "555-1111");
        assert!(contact.matches_lowercase("ann"));
        assert!(contact.matches_lowercase("5-11"));
        assert!(contact.matches_lowercase(""));
        assert!(!contact.matches_lowercase("bob"));
    }
}
