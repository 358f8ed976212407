use inkdrop_core::{StorageError, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The paste is unknown, expired, or out of views. The cause is
    /// deliberately not distinguished.
    #[error("paste not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
