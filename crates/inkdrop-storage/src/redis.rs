use crate::memory::marker_ttl_secs;
use async_trait::async_trait;
use inkdrop_core::error::Result;
use inkdrop_core::{NewPaste, Paste, PasteId, PasteStore, StorageError};
use jiff::Timestamp;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

const HEALTH_CHECK_KEY: &str = "__health_check__";

/// Key layout for the Redis backend.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisStoreConfig {
    /// Prefix for paste documents.
    #[builder(default = "paste:".to_string(), setter(into))]
    pub paste_prefix: String,
    /// Prefix for the expiring cleanup markers.
    #[builder(default = "ttl:".to_string(), setter(into))]
    pub marker_prefix: String,
    /// `COUNT` hint for each `SCAN` round during a purge.
    #[builder(default = 100)]
    pub scan_count: usize,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RedisStoreConfig {
    /// Prepends `namespace` to both key prefixes.
    pub fn namespaced(mut self, namespace: &str) -> Self {
        self.paste_prefix = format!("{namespace}{}", self.paste_prefix);
        self.marker_prefix = format!("{namespace}{}", self.marker_prefix);
        self
    }
}

/// The JSON document stored under each paste key.
///
/// Timestamps are Unix epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasteDocument {
    id: String,
    content: String,
    created_at: i64,
    expires_at: Option<i64>,
    max_views: Option<u32>,
    view_count: u32,
}

impl From<&Paste> for PasteDocument {
    fn from(paste: &Paste) -> Self {
        Self {
            id: paste.id.as_str().to_owned(),
            content: paste.content.clone(),
            created_at: paste.created_at.as_millisecond(),
            expires_at: paste.expires_at.map(|ts| ts.as_millisecond()),
            max_views: paste.max_views,
            view_count: paste.view_count,
        }
    }
}

impl TryFrom<PasteDocument> for Paste {
    type Error = StorageError;

    fn try_from(doc: PasteDocument) -> Result<Self> {
        let id = PasteId::new(doc.id).map_err(|e| StorageError::InvalidData(e.to_string()))?;
        Ok(Paste {
            id,
            content: doc.content,
            created_at: parse_millis(doc.created_at)?,
            expires_at: doc.expires_at.map(parse_millis).transpose()?,
            max_views: doc.max_views,
            view_count: doc.view_count,
        })
    }
}

fn parse_millis(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid timestamp '{}': {e}", millis))
    })
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

/// A Redis-backed implementation of [`PasteStore`].
///
/// Pastes are JSON documents under `{paste_prefix}{id}`. Expiring pastes
/// also get a `{marker_prefix}{id}` key with a native Redis TTL, a hint for
/// external cleanup. The document itself carries no TTL; availability is
/// decided by the policy, and [`PasteStore::purge_expired`] removes expired
/// documents.
#[derive(Clone)]
pub struct RedisPasteStore {
    conn: redis::aio::MultiplexedConnection,
    config: RedisStoreConfig,
}

impl std::fmt::Debug for RedisPasteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPasteStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RedisPasteStore {
    /// Creates a store over an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection, config: RedisStoreConfig) -> Self {
        Self { conn, config }
    }

    /// Opens a new multiplexed connection to `url`.
    pub async fn connect(url: &str, config: RedisStoreConfig) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| map_redis_error("failed to parse Redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        info!(paste_prefix = %config.paste_prefix, "connected to Redis paste store");
        Ok(Self::new(conn, config))
    }

    fn paste_key(&self, id: &PasteId) -> String {
        format!("{}{}", self.config.paste_prefix, id.as_str())
    }

    fn marker_key(&self, id: &PasteId) -> String {
        format!("{}{}", self.config.marker_prefix, id.as_str())
    }

    async fn read_document(&self, key: &str) -> Result<Option<PasteDocument>> {
        let mut conn = self.conn.clone();
        let raw = conn
            .get::<_, Option<String>>(key)
            .await
            .map_err(|e| map_redis_error("failed to fetch paste from Redis", e))?;

        raw.map(|json| {
            serde_json::from_str::<PasteDocument>(&json).map_err(|e| {
                StorageError::InvalidData(format!("invalid paste document at '{key}': {e}"))
            })
        })
        .transpose()
    }

    async fn write_document(&self, key: &str, doc: &PasteDocument) -> Result<()> {
        let json = serde_json::to_string(doc).map_err(|e| {
            StorageError::Serialization(format!("failed to serialize paste document: {e}"))
        })?;

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, json)
            .await
            .map_err(|e| map_redis_error("failed to write paste to Redis", e))
    }

    /// One `SCAN` round. Returns the next cursor and the keys found.
    async fn scan_pastes(&self, cursor: u64) -> Result<(u64, Vec<String>)> {
        let mut conn = self.conn.clone();
        redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(format!("{}*", self.config.paste_prefix))
            .arg("COUNT")
            .arg(self.config.scan_count)
            .query_async::<(u64, Vec<String>)>(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to scan pastes in Redis", e))
    }
}

#[async_trait]
impl PasteStore for RedisPasteStore {
    async fn create(&self, paste: NewPaste) -> Result<()> {
        let key = self.paste_key(&paste.id);
        let marker = paste.expires_at.map(|expires_at| {
            (
                self.marker_key(&paste.id),
                marker_ttl_secs(paste.created_at, expires_at),
            )
        });
        let paste = paste.into_paste();
        trace!(id = %paste.id, "storing paste in Redis");

        self.write_document(&key, &PasteDocument::from(&paste))
            .await
            .inspect_err(|e| warn!(id = %paste.id, error = %e, "failed to store paste"))?;

        if let Some((marker_key, ttl_secs)) = marker {
            let mut conn = self.conn.clone();
            conn.set_ex::<_, _, ()>(&marker_key, paste.id.as_str(), ttl_secs)
                .await
                .map_err(|e| map_redis_error("failed to write cleanup marker to Redis", e))?;
            trace!(id = %paste.id, ttl_secs, "registered cleanup marker");
        }

        debug!(id = %paste.id, "stored paste in Redis");
        Ok(())
    }

    async fn get(&self, id: &PasteId) -> Result<Option<Paste>> {
        let key = self.paste_key(id);
        match self.read_document(&key).await? {
            Some(doc) => Paste::try_from(doc).map(Some),
            None => {
                trace!(id = %id, "paste not found in Redis");
                Ok(None)
            }
        }
    }

    async fn increment_view(&self, id: &PasteId) -> Result<()> {
        let key = self.paste_key(id);
        let Some(mut doc) = self.read_document(&key).await? else {
            return Ok(());
        };

        doc.view_count = doc.view_count.saturating_add(1);
        self.write_document(&key, &doc).await?;
        trace!(id = %id, view_count = doc.view_count, "incremented view count");
        Ok(())
    }

    async fn delete(&self, id: &PasteId) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed = conn
            .del::<_, usize>(self.paste_key(id))
            .await
            .map_err(|e| map_redis_error("failed to delete paste from Redis", e))?;
        conn.del::<_, ()>(self.marker_key(id))
            .await
            .map_err(|e| map_redis_error("failed to delete cleanup marker from Redis", e))?;

        debug!(id = %id, existed = removed > 0, "deleted paste from Redis");
        Ok(removed > 0)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(HEALTH_CHECK_KEY)
            .await
            .map(|_| ())
            .map_err(|e| map_redis_error("Redis health check failed", e))
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize> {
        let mut removed = 0;
        let mut cursor = 0;

        loop {
            let (next, keys) = self.scan_pastes(cursor).await?;

            for key in keys {
                // the key names the paste, whatever the document claims
                let Some(id) = key.strip_prefix(self.config.paste_prefix.as_str()) else {
                    continue;
                };
                let id = PasteId::new_unchecked(id);

                let doc = match self.read_document(&key).await {
                    Ok(Some(doc)) => doc,
                    // deleted between SCAN and GET
                    Ok(None) => continue,
                    Err(StorageError::InvalidData(message)) => {
                        warn!(
                            key = %key,
                            error = %message,
                            "skipping unreadable paste during purge"
                        );
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                let expired = doc
                    .expires_at
                    .is_some_and(|expires_at| expires_at <= now.as_millisecond());
                if !expired {
                    continue;
                }

                if self.delete(&id).await? {
                    removed += 1;
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(removed, "purged expired pastes from Redis");
        Ok(removed)
    }
}
