//! Core types and traits for the inkdrop paste service.
//!
//! This crate holds the paste model, the availability policy, the time
//! source and the [`PasteStore`] contract shared by the storage backends,
//! the service layer and the HTTP gateway.

pub mod clock;
pub mod error;
pub mod params;
pub mod paste;
pub mod policy;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock, TimeSource};
pub use error::{CoreError, FieldViolation, StorageError, ValidationError};
pub use params::CreatePasteParams;
pub use paste::{NewPaste, Paste, PasteId};
pub use policy::{is_available, remaining_views, Unavailability};
pub use store::PasteStore;
