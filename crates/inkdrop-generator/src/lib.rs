pub mod random;
pub mod seq;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use inkdrop_core::PasteId;

/// Trait for generating paste ids.
///
/// Implementations are pure generators that don't interact with storage.
/// Collisions are not checked against the store, so implementations must
/// make them practically impossible.
pub trait Generator: Send + Sync + 'static {
    /// Generates a new, unique paste id.
    fn generate(&self) -> PasteId;
}
