//! Domain model for the contact client.
//!
//! # Responsibility
//! - Define the records exchanged with the remote store.
//! - Keep local input validation next to the data it guards.
//!
//! # Invariants
//! - Every stored contact is identified by a server-assigned `ContactId`.
//! - The client never invents ids; a contact exists locally only after the
//!   remote store confirmed it.

pub mod contact;
