use std::sync::Arc;

use inkdrop_core::TimeSource;
use inkdrop_service::service::DEFAULT_MAX_CONTENT_BYTES;
use inkdrop_service::Pastebin;

/// Slack on top of the content limit for the JSON envelope.
const JSON_OVERHEAD_BYTES: usize = 16 * 1024;

/// Largest request body accepted for a given content limit. JSON escaping
/// can grow a single byte to six (`\u0000`).
pub fn body_limit_for(max_content_bytes: usize) -> usize {
    max_content_bytes
        .saturating_mul(6)
        .saturating_add(JSON_OVERHEAD_BYTES)
}

#[derive(Clone)]
pub struct AppState {
    pastebin: Arc<dyn Pastebin>,
    time: TimeSource,
    public_base_url: Option<String>,
    body_limit: usize,
}

impl AppState {
    pub fn new(pastebin: Arc<dyn Pastebin>, time: TimeSource) -> Self {
        Self {
            pastebin,
            time,
            public_base_url: None,
            body_limit: body_limit_for(DEFAULT_MAX_CONTENT_BYTES),
        }
    }

    /// Fixes the base of returned paste URLs instead of deriving it from
    /// request headers.
    pub fn with_public_base_url(mut self, public_base_url: Option<String>) -> Self {
        self.public_base_url = public_base_url;
        self
    }

    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    pub fn pastebin(&self) -> &dyn Pastebin {
        self.pastebin.as_ref()
    }

    pub fn time(&self) -> &TimeSource {
        &self.time
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }
}
