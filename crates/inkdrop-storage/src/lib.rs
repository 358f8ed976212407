//! Paste store backends.
//!
//! [`InMemoryPasteStore`] keeps everything in process and doubles as the fake
//! used by tests. [`RedisPasteStore`] talks to a Redis-compatible key-value
//! server.

pub mod memory;
pub mod redis;

pub use crate::redis::{RedisPasteStore, RedisStoreConfig};
pub use inkdrop_core::store::PasteStore;
pub use inkdrop_core::StorageError;
pub use memory::InMemoryPasteStore;
