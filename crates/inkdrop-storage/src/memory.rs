use async_trait::async_trait;
use dashmap::DashMap;
use inkdrop_core::error::Result;
use inkdrop_core::{NewPaste, Paste, PasteId, PasteStore};
use jiff::{SignedDuration, Timestamp};
use tracing::{debug, trace};

/// Seconds a cleanup marker lives for a paste created at `created_at` that
/// expires at `expires_at`. Never less than one second.
pub(crate) fn marker_ttl_secs(created_at: Timestamp, expires_at: Timestamp) -> u64 {
    let millis = expires_at.duration_since(created_at).as_millis().max(0);
    let secs = (millis + 999) / 1000;
    u64::try_from(secs).unwrap_or(u64::MAX).max(1)
}

/// In-memory implementation of [`PasteStore`] using DashMap.
///
/// Records are never dropped on their own. Like the Redis backend, an
/// expiring paste gets a separate cleanup marker, and expired records are
/// only removed by [`PasteStore::purge_expired`] or [`PasteStore::delete`].
#[derive(Debug, Default)]
pub struct InMemoryPasteStore {
    pastes: DashMap<String, Paste>,
    markers: DashMap<String, Timestamp>,
}

impl InMemoryPasteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pastes: DashMap::with_capacity(capacity),
            markers: DashMap::new(),
        }
    }

    /// Number of stored pastes, expired ones included.
    pub fn len(&self) -> usize {
        self.pastes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pastes.is_empty()
    }

    /// The instant the cleanup marker for `id` lapses, if one was registered.
    pub fn marker_deadline(&self, id: &PasteId) -> Option<Timestamp> {
        self.markers.get(id.as_str()).map(|deadline| *deadline)
    }
}

#[async_trait]
impl PasteStore for InMemoryPasteStore {
    async fn create(&self, paste: NewPaste) -> Result<()> {
        let key = paste.id.as_str().to_owned();
        trace!(id = %paste.id, "storing paste in memory");

        if let Some(expires_at) = paste.expires_at {
            let ttl = marker_ttl_secs(paste.created_at, expires_at);
            let deadline = paste
                .created_at
                .checked_add(SignedDuration::from_secs(i64::try_from(ttl).unwrap_or(i64::MAX)))
                .unwrap_or(expires_at);
            self.markers.insert(key.clone(), deadline);
        }

        self.pastes.insert(key, paste.into_paste());
        Ok(())
    }

    async fn get(&self, id: &PasteId) -> Result<Option<Paste>> {
        Ok(self.pastes.get(id.as_str()).map(|entry| entry.clone()))
    }

    async fn increment_view(&self, id: &PasteId) -> Result<()> {
        if let Some(mut entry) = self.pastes.get_mut(id.as_str()) {
            entry.view_count = entry.view_count.saturating_add(1);
            trace!(id = %id, view_count = entry.view_count, "incremented view count");
        }
        Ok(())
    }

    async fn delete(&self, id: &PasteId) -> Result<bool> {
        self.markers.remove(id.as_str());
        Ok(self.pastes.remove(id.as_str()).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize> {
        let expired: Vec<String> = self
            .pastes
            .iter()
            .filter(|entry| entry.expires_at.is_some_and(|expires_at| expires_at <= now))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0;
        for key in expired {
            self.markers.remove(&key);
            if self.pastes.remove(&key).is_some() {
                removed += 1;
            }
        }

        debug!(removed, "purged expired pastes from memory");
        Ok(removed)
    }
}
