use crate::Generator;
use inkdrop_core::PasteId;
use rand::RngCore;
use typed_builder::TypedBuilder;

/// Generates ids from random bytes encoded as base58.
///
/// The default of 16 bytes gives 128 bits of entropy, comparable to a
/// 21-character nanoid, in roughly 22 characters.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGenerator {
    #[builder(default = 16)]
    byte_len: usize,
}

impl RandomGenerator {
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> PasteId {
        let mut bytes = vec![0_u8; self.byte_len.max(1)];
        rand::thread_rng().fill_bytes(&mut bytes);
        // base58 output is alphanumeric, always a valid id
        PasteId::new_unchecked(bs58::encode(bytes).into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_pass_validation() {
        let generator = RandomGenerator::default();
        for _ in 0..100 {
            let id = generator.generate();
            assert!(PasteId::new(id.as_str()).is_ok(), "invalid id: {id}");
        }
    }

    #[test]
    fn generated_ids_are_distinct() {
        let generator = RandomGenerator::default();
        let ids: HashSet<_> = (0..1_000).map(|_| generator.generate()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn byte_len_controls_id_length() {
        let short = RandomGenerator::builder().byte_len(4).build();
        let long = RandomGenerator::builder().byte_len(32).build();

        assert!(short.generate().as_str().len() <= 6);
        assert!(long.generate().as_str().len() >= 40);
    }
}
