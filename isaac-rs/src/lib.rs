//! # isaac-rs: seedable ISAAC generator for reproducible Monte Carlo runs
//!
//! Wraps Bob Jenkins' ISAAC PRNG (Public Domain) in a small generator that
//! hands out uniform and normal variates directly and implements
//! [`rand_core::RngCore`] and [`rand_core::SeedableRng`], so every `rand`
//! extension trait and distribution works on top of it.
//!
//! The stream for a given 64-bit seed is fixed by this crate alone and does
//! not change with the version of `rand` in use.

mod engine;

use crate::engine::IsaacCore;
use rand_core::{RngCore, SeedableRng, impls};

/// Seeded ISAAC generator
#[derive(Clone)]
pub struct Isaac {
    core: IsaacCore,
    spare_normal: Option<f64>,
}

impl Isaac {
    /// Create a new generator with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            core: IsaacCore::from_u64(seed),
            spare_normal: None,
        }
    }

    /// Get a random 32-bit unsigned integer
    #[inline]
    pub fn rand32(&mut self) -> u32 {
        self.core.next_u32()
    }

    /// Get a random 64-bit unsigned integer
    #[inline]
    pub fn rand64(&mut self) -> u64 {
        let hi = self.rand32() as u64;
        let lo = self.rand32() as u64;
        (hi << 32) | lo
    }

    /// Generate a uniform random number in [0, 1) with 53 bits of resolution
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (self.rand64() >> 11) as f64 * SCALE
    }

    /// Generate a standard normal variate (Marsaglia polar method).
    ///
    /// Variates come in pairs; the second one is cached on the generator.
    pub fn normal(&mut self) -> f64 {
        if let Some(y) = self.spare_normal.take() {
            return y;
        }
        loop {
            let x1 = 2.0 * self.uniform() - 1.0;
            let x2 = 2.0 * self.uniform() - 1.0;
            let w = x1 * x1 + x2 * x2;
            if w > 0.0 && w < 1.0 {
                let scale = ((-2.0 * w.ln()) / w).sqrt();
                self.spare_normal = Some(x2 * scale);
                return x1 * scale;
            }
        }
    }

    /// Generate a Gaussian random variable with given standard deviation
    #[inline]
    pub fn gaussian(&mut self, sigma: f64) -> f64 {
        self.normal() * sigma
    }
}

impl Default for Isaac {
    fn default() -> Self {
        Self::new(17)
    }
}

impl RngCore for Isaac {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.rand32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.rand64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for Isaac {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    // Keep `seed_from_u64(s)` and `Isaac::new(s)` on the same stream.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
