// Copyright (c) 2024 Mike Tsao

//! Provides a random-number generator for prototyping and testing. Automation
//! itself never uses it.

use byteorder::{BigEndian, ByteOrder};
use delegate::delegate;

/// A pseudorandom number generator (PRNG) that doesn't need to be
/// cryptographically secure.
#[derive(Debug)]
pub struct Rng(oorandom::Rand64);
impl Default for Rng {
    fn default() -> Self {
        // If the OS can't hand out a seed, fall back to a fixed one rather
        // than refusing to run.
        Self::new_with_seed(Self::generate_seed().unwrap_or(Self::FALLBACK_SEED))
    }
}
#[allow(missing_docs)]
impl Rng {
    const FALLBACK_SEED: u128 = 0x5eed_0f_a11_5eed;

    /// Pass the same number to [Rng::new_with_seed()] to get the same stream
    /// back again. Good for reproducing test failures.
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    /// Creates a seed from the operating system's entropy source.
    pub fn generate_seed() -> anyhow::Result<u128> {
        let mut bytes = [0u8; 16];

        getrandom::getrandom(&mut bytes)?;
        Ok(BigEndian::read_u128(&bytes))
    }

    /// A float in `[low, high)`.
    pub fn rand_f64_in(&mut self, low: f64, high: f64) -> f64 {
        low + self.rand_float() * (high - low)
    }

    delegate! {
        to self.0 {
            pub fn rand_u64(&mut self) -> u64;
            pub fn rand_float(&mut self) -> f64;
            pub fn rand_range(&mut self, range: core::ops::Range<u64>) -> u64;
        }
    }
}
