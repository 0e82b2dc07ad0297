//! Owned, explicitly seeded random streams
//!
//! Every stochastic component (CPU-load generation, humidity noise) owns one
//! `NoiseStream`. There is no process-wide generator, so two nodes stepping
//! on different threads never perturb each other's sequences.
//!
//! ChaCha8 is used because its output for a given seed is fixed by the
//! algorithm, not by the `rand` release in use.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Independent uniform noise source
#[derive(Debug, Clone)]
pub struct NoiseStream {
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl NoiseStream {
    /// Stream that reproduces the same draws for the same seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Stream seeded from operating-system entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// Seeded stream when a seed is given, entropy-seeded otherwise
    pub fn from_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Seed this stream was created with, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Draw uniformly from `[-amplitude, amplitude)`
    ///
    /// An amplitude that is not positive and finite returns 0.0 without
    /// consuming a draw. The draw is scaled in two halves so amplitudes near
    /// `f64::MAX` stay finite.
    pub fn uniform(&mut self, amplitude: f64) -> f64 {
        if !(amplitude > 0.0 && amplitude.is_finite()) {
            return 0.0;
        }
        let unit: f64 = self.rng.gen();
        amplitude * unit - amplitude * (1.0 - unit)
    }
}

/// Seed for a secondary stream derived from a primary seed
pub fn derive_seed(seed: u64, offset: u64) -> u64 {
    seed ^ offset
}
