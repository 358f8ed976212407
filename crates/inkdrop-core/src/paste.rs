use crate::error::CoreError;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const MAX_ID_LENGTH: usize = 64;

/// A validated paste identifier.
///
/// Identifiers are opaque to clients. They must be 1-64 characters long and
/// contain only alphanumeric characters, hyphens, or underscores, which keeps
/// them safe to embed in URLs and backend keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasteId(String);

impl PasteId {
    /// Creates a new `PasteId` after validating the input.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Creates a `PasteId` without validation.
    ///
    /// Use this only for ids produced by trusted internal sources
    /// (e.g. generators that are guaranteed to produce valid output).
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the retrieval URL for this paste under `base_url`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/p/{}", base_url.trim_end_matches('/'), self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), CoreError> {
        if id.is_empty() || id.len() > MAX_ID_LENGTH {
            return Err(CoreError::InvalidPasteId(format!(
                "length must be between 1 and {}, got {}",
                MAX_ID_LENGTH,
                id.len()
            )));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::InvalidPasteId(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                id
            )));
        }

        Ok(())
    }
}

impl Display for PasteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PasteId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PasteId> for String {
    fn from(value: PasteId) -> Self {
        value.0
    }
}

/// A paste as submitted, before the store assigns it a view count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaste {
    pub id: PasteId,
    pub content: String,
    pub created_at: Timestamp,
    /// Absolute instant after which the paste is no longer served.
    pub expires_at: Option<Timestamp>,
    pub max_views: Option<u32>,
}

impl NewPaste {
    /// Turns the submission into a stored record with zero views.
    pub fn into_paste(self) -> Paste {
        Paste {
            id: self.id,
            content: self.content,
            created_at: self.created_at,
            expires_at: self.expires_at,
            max_views: self.max_views,
            view_count: 0,
        }
    }
}

/// A stored paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paste {
    pub id: PasteId,
    pub content: String,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    pub max_views: Option<u32>,
    /// Successful retrievals so far. Only ever incremented.
    pub view_count: u32,
}
