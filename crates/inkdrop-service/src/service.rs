use crate::error::ServiceError;
use crate::pastebin::{CreatedPaste, PasteView, Pastebin};
use async_trait::async_trait;
use inkdrop_core::{policy, CreatePasteParams, Paste, PasteId, PasteStore};
use inkdrop_generator::Generator;
use jiff::Timestamp;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

/// Default content limit, 1 MiB.
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceSettings {
    /// Largest accepted paste content, in bytes.
    #[builder(default = DEFAULT_MAX_CONTENT_BYTES)]
    pub max_content_bytes: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the [`Pastebin`] trait.
///
/// This service wraps a [`PasteStore`] and a [`Generator`] to handle:
/// - input validation and id generation on create
/// - the check-then-increment retrieval flow
/// - expiry purges
///
/// The generator is responsible for id uniqueness. No collision retry is
/// performed.
#[derive(Debug)]
pub struct PasteService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    settings: ServiceSettings,
}

impl<S, G> Clone for PasteService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<S: PasteStore, G: Generator> PasteService<S, G> {
    pub fn new(store: S, generator: G) -> Self {
        Self::with_settings(Arc::new(store), generator, ServiceSettings::default())
    }

    /// Builds a service over a store that is shared with other owners.
    pub fn with_settings(store: Arc<S>, generator: G, settings: ServiceSettings) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
            settings,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn load_available(
        &self,
        id: &PasteId,
        now: Timestamp,
    ) -> Result<Option<Paste>, ServiceError> {
        let Some(paste) = self.store.get(id).await? else {
            trace!(id = %id, "paste not found");
            return Ok(None);
        };

        if let Some(reason) = policy::check(&paste, now) {
            debug!(id = %id, %reason, "paste unavailable");
            return Ok(None);
        }

        Ok(Some(paste))
    }
}

#[async_trait]
impl<S: PasteStore, G: Generator> Pastebin for PasteService<S, G> {
    async fn create(
        &self,
        params: CreatePasteParams,
        now: Timestamp,
    ) -> Result<CreatedPaste, ServiceError> {
        let validated = params.validate(self.settings.max_content_bytes)?;
        let id = self.generator.generate();
        let new_paste = validated.into_new_paste(id.clone(), now)?;
        let expires_at = new_paste.expires_at;

        info!(
            id = %id,
            size = new_paste.content.len(),
            expires_at = ?expires_at,
            max_views = ?new_paste.max_views,
            "new paste"
        );

        self.store.create(new_paste).await?;

        Ok(CreatedPaste { id, expires_at })
    }

    async fn view(&self, id: &PasteId, now: Timestamp) -> Result<PasteView, ServiceError> {
        // The policy runs before the increment so an exhausted paste is never
        // counted again.
        if self.load_available(id, now).await?.is_none() {
            return Err(ServiceError::NotFound);
        }

        self.store.increment_view(id).await?;

        // Re-read to report the counter as stored.
        let updated = self.store.get(id).await?.ok_or(ServiceError::NotFound)?;
        let remaining_views = policy::remaining_views(&updated);
        debug!(id = %id, view_count = updated.view_count, ?remaining_views, "served paste");

        Ok(PasteView {
            content: updated.content,
            remaining_views,
            expires_at: updated.expires_at,
        })
    }

    async fn peek(&self, id: &PasteId, now: Timestamp) -> Result<Option<Paste>, ServiceError> {
        self.load_available(id, now).await
    }

    async fn delete(&self, id: &PasteId) -> Result<bool, ServiceError> {
        let existed = self.store.delete(id).await?;
        debug!(id = %id, existed, "deleted paste");
        Ok(existed)
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize, ServiceError> {
        let removed = self.store.purge_expired(now).await?;
        if removed > 0 {
            info!(removed, "purged expired pastes");
        }
        Ok(removed)
    }

    async fn healthy(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "store health check failed");
                false
            }
        }
    }
}
