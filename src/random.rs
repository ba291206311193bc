// Meter Synth - Random sources
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Random sources for noise and identifier generation.
//!
//! Both variants use ChaCha8, whose output stream is fixed by the seed
//! on every platform. Only construction differs: the seeded variant
//! remembers its seed, the entropy variant draws its key from the OS.

use crate::error::RandomError;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A uniform random source, reproducible or not.
#[derive(Debug, Clone)]
pub enum RandomSource {
    /// Reproducible stream derived from `seed`.
    Seeded { seed: u64, rng: ChaCha8Rng },
    /// Stream keyed from OS entropy.
    Entropy { rng: ChaCha8Rng },
}

impl RandomSource {
    /// Create a reproducible source.
    pub fn seeded(seed: u64) -> Self {
        RandomSource::Seeded {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a non-reproducible source.
    pub fn from_entropy() -> Self {
        RandomSource::Entropy {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => RandomSource::seeded(s),
            None => RandomSource::from_entropy(),
        }
    }

    /// Whether identical construction reproduces the same stream.
    pub fn is_deterministic(&self) -> bool {
        matches!(self, RandomSource::Seeded { .. })
    }

    /// Seed of a reproducible source.
    pub fn seed(&self) -> Option<u64> {
        match self {
            RandomSource::Seeded { seed, .. } => Some(*seed),
            RandomSource::Entropy { .. } => None,
        }
    }

    fn rng(&mut self) -> &mut ChaCha8Rng {
        match self {
            RandomSource::Seeded { rng, .. } | RandomSource::Entropy { rng } => rng,
        }
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_uniform(&mut self) -> f64 {
        self.rng().gen::<f64>()
    }

    /// Uniform integer in `[0, max)`.
    pub fn next_int(&mut self, max: i64) -> Result<i64, RandomError> {
        if max <= 0 {
            return Err(RandomError::NonPositiveBound { max });
        }
        Ok(self.rng().gen_range(0..max))
    }

    /// Uniform integer in `[min, max)`.
    pub fn next_int_range(&mut self, min: i64, max: i64) -> Result<i64, RandomError> {
        if min >= max {
            return Err(RandomError::InvertedRange { min, max });
        }
        Ok(self.rng().gen_range(min..max))
    }

    /// Fill `dest` with random bytes.
    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng().fill_bytes(dest);
    }
}
