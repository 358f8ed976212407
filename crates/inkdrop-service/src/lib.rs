//! Paste lifecycle service.
//!
//! [`PasteService`] wires a [`PasteStore`](inkdrop_core::PasteStore) and a
//! [`Generator`](inkdrop_generator::Generator) together and applies the
//! availability policy on every retrieval.

pub mod error;
pub mod pastebin;
pub mod service;

pub use error::ServiceError;
pub use pastebin::{CreatedPaste, PasteView, Pastebin};
pub use service::{PasteService, ServiceSettings};
