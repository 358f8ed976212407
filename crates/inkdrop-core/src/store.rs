use crate::error::Result;
use crate::paste::{NewPaste, Paste, PasteId};
use async_trait::async_trait;
use jiff::Timestamp;

/// Persistence contract for pastes.
///
/// The store is the sole source of truth: callers never cache records. The
/// trait is object safe so the gateway can hold any backend behind
/// `Arc<dyn PasteStore>`.
#[async_trait]
pub trait PasteStore: Send + Sync + 'static {
    /// Persists a new paste with a view count of zero.
    ///
    /// If the paste has an expiration instant, a time-bounded cleanup marker
    /// is registered next to it.
    async fn create(&self, paste: NewPaste) -> Result<()>;

    /// Returns the paste, or `None` if it is unknown or was removed by the
    /// backend.
    async fn get(&self, id: &PasteId) -> Result<Option<Paste>>;

    /// Adds one to the view counter. Does nothing if the paste is absent.
    ///
    /// This is a read-modify-write and is not atomic: concurrent increments
    /// on the same paste may lose updates.
    async fn increment_view(&self, id: &PasteId) -> Result<()>;

    /// Removes the paste and its cleanup marker.
    /// Returns `true` if the paste existed.
    async fn delete(&self, id: &PasteId) -> Result<bool>;

    /// Performs a cheap round trip to the backend.
    async fn ping(&self) -> Result<()>;

    /// Deletes every paste whose expiration instant is at or before `now`.
    /// Returns the number of pastes removed.
    async fn purge_expired(&self, now: Timestamp) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn store_is_object_safe() {
        fn accepts(_: Option<Arc<dyn PasteStore>>) {}
        accepts(None);
    }
}
