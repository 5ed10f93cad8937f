// src/menu_sync/utils/ids.rs
// Client-side photo ids: "{millis}-{batch index}-{random base36 suffix}".
// Not cryptographic, only unique enough to never collide inside a batch.

use crate::models::common::{PhotoId, TimestampMs};
use crate::utils::time::now_millis;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
pub const DEFAULT_SUFFIX_LEN: usize = 9;

pub struct PhotoIdGenerator {
    rng: RefCell<StdRng>,
    suffix_len: usize,
}

impl PhotoIdGenerator {
    /// Seeds from OS entropy. Canisters have none; seed them from `raw_rand`
    /// with [`PhotoIdGenerator::seeded`] instead.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_entropy(suffix_len: usize) -> Self {
        Self {
            rng: RefCell::new(StdRng::from_entropy()),
            suffix_len,
        }
    }

    pub fn seeded(seed: u64, suffix_len: usize) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            suffix_len,
        }
    }

    pub fn next_id(&self, index: usize) -> PhotoId {
        self.id_at(now_millis(), index)
    }

    pub fn id_at(&self, timestamp_ms: TimestampMs, index: usize) -> PhotoId {
        let mut rng = self.rng.borrow_mut();
        let suffix: String = (0..self.suffix_len)
            .map(|_| BASE36_ALPHABET[rng.gen_range(0..BASE36_ALPHABET.len())] as char)
            .collect();
        format!("{}-{}-{}", timestamp_ms, index, suffix)
    }

    /// Ids for a whole batch, sharing one timestamp.
    pub fn batch(&self, count: usize) -> Vec<PhotoId> {
        let timestamp_ms = now_millis();
        (0..count).map(|index| self.id_at(timestamp_ms, index)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn batch_ids_are_distinct() {
        let ids = PhotoIdGenerator::seeded(7, DEFAULT_SUFFIX_LEN).batch(500);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 500);
    }

    #[test]
    fn entropy_seeded_generators_differ() {
        let first = PhotoIdGenerator::from_entropy(DEFAULT_SUFFIX_LEN).id_at(1, 0);
        let second = PhotoIdGenerator::from_entropy(DEFAULT_SUFFIX_LEN).id_at(1, 0);
        assert_ne!(first, second);
        assert_eq!(first.len(), "1-0-".len() + DEFAULT_SUFFIX_LEN);
    }

    #[test]
    fn id_layout() {
        let id = PhotoIdGenerator::seeded(1, DEFAULT_SUFFIX_LEN).id_at(1_700_000_000_000, 3);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "1700000000000");
        assert_eq!(parts[1], "3");
        assert_eq!(parts[2].len(), DEFAULT_SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| BASE36_ALPHABET.contains(&b)));
    }
}
