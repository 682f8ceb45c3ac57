//! Client use-case services.
//!
//! # Responsibility
//! - Keep the contact collection consistent with the remote store.
//! - Coordinate form, delete-confirmation and session lifecycle flows.
//! - Stay transport-agnostic; remote access goes through gateway traits.

pub mod auth_service;
pub mod contact_list;
pub mod edit_session;
