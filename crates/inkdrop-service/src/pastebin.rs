use crate::error::ServiceError;
use async_trait::async_trait;
use inkdrop_core::{CreatePasteParams, Paste, PasteId};
use jiff::Timestamp;

type Result<T> = std::result::Result<T, ServiceError>;

/// A freshly stored paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPaste {
    pub id: PasteId,
    pub expires_at: Option<Timestamp>,
}

/// What a successful retrieval hands back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteView {
    pub content: String,
    /// Views left after this one, `None` when unbounded.
    pub remaining_views: Option<u32>,
    pub expires_at: Option<Timestamp>,
}

/// The operations the HTTP layer needs, object safe so the gateway can be
/// built over any store/generator pair.
///
/// Every time-dependent operation takes `now` explicitly; callers resolve it
/// through a [`TimeSource`](inkdrop_core::TimeSource).
#[async_trait]
pub trait Pastebin: Send + Sync + 'static {
    /// Validates `params` and stores a new paste created at `now`.
    async fn create(&self, params: CreatePasteParams, now: Timestamp) -> Result<CreatedPaste>;

    /// Serves the paste if it is available at `now`, counting one view.
    ///
    /// Returns [`ServiceError::NotFound`] for unknown, expired and
    /// view-exhausted pastes alike.
    async fn view(&self, id: &PasteId, now: Timestamp) -> Result<PasteView>;

    /// Returns the paste if it is available at `now` without counting a view.
    async fn peek(&self, id: &PasteId, now: Timestamp) -> Result<Option<Paste>>;

    /// Removes a paste. Returns `true` if it existed.
    async fn delete(&self, id: &PasteId) -> Result<bool>;

    /// Removes every paste that expired at or before `now`.
    async fn purge_expired(&self, now: Timestamp) -> Result<usize>;

    /// Whether the backing store answers.
    async fn healthy(&self) -> bool;
}
