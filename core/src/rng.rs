//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through RecordRng instances derived
//! from the single master seed of a generation run.
//!
//! Each record gets its own RNG stream, seeded deterministically
//! from (master_seed XOR record_index * golden ratio). This means:
//!   - Record N is identical whatever the batch size, as long as the seed matches.
//!   - Any record can be regenerated in isolation.

use crate::types::Seed;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A deterministic RNG stream for a single record.
pub struct RecordRng {
    pub index: u64,
    inner: Pcg64Mcg,
}

impl RecordRng {
    /// Create a record RNG from the master seed and the record's
    /// 1-based sequence number.
    pub fn new(master_seed: Seed, index: u64) -> Self {
        let derived_seed = master_seed ^ (index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            index,
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Pick one element uniformly. Panics on an empty slice; domains are
    /// validated before generation starts.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        items.choose(&mut self.inner).expect("pick from empty domain")
    }

    /// Uniform integer in [lo, hi].
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        self.inner.gen_range(lo..=hi)
    }

    /// Uniform integer in [lo, hi].
    pub fn range_u64(&mut self, lo: u64, hi: u64) -> u64 {
        self.inner.gen_range(lo..=hi)
    }

    /// Uniform float in [lo, hi].
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.inner.gen_range(lo..=hi)
    }

    /// Draw between `min` and `max` distinct elements (without replacement).
    /// The upper bound is capped at the number of available items.
    pub fn sample_distinct<T: Clone>(&mut self, items: &[T], min: usize, max: usize) -> Vec<T> {
        let max = max.min(items.len());
        let min = min.min(max);
        let k = self.inner.gen_range(min..=max);
        items
            .choose_multiple(&mut self.inner, k)
            .cloned()
            .collect()
    }
}

/// All record RNGs for a single run.
pub struct RngBank {
    master_seed: Seed,
}

impl RngBank {
    pub fn new(master_seed: Seed) -> Self {
        Self { master_seed }
    }

    pub fn seed(&self) -> Seed {
        self.master_seed
    }

    pub fn for_record(&self, seq: usize) -> RecordRng {
        RecordRng::new(self.master_seed, seq as u64)
    }
}
