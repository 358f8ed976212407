use crate::Generator;
use inkdrop_core::PasteId;
use std::sync::atomic::{AtomicU64, Ordering};

/// A sequential id generator.
///
/// Produces ids like "p000000", "p000001", ... Unique within a single
/// instance only, which makes it a predictable choice for tests.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl SeqGenerator {
    /// Creates a generator with the given prefix, starting at zero.
    ///
    /// The prefix must only contain alphanumeric characters, hyphens, or
    /// underscores for the output to be a valid paste id.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, 0)
    }

    /// Creates a generator starting from a specific counter value.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
            prefix: prefix.into(),
        }
    }
}

impl Generator for SeqGenerator {
    fn generate(&self) -> PasteId {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        PasteId::new_unchecked(format!("{}{:06}", self.prefix, count))
    }
}
