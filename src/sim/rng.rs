//! Injected randomness for pipe placement
//!
//! The core never seeds anything itself. Hosts hand it a source, usually a
//! seeded `Pcg32`, so any run can be replayed bit-for-bit.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniformly distributed floats
pub trait RandomSource {
    /// Uniform draw from the closed range `[min, max]`
    fn next_float(&mut self, min: f32, max: f32) -> f32;
}

impl RandomSource for Pcg32 {
    fn next_float(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.random_range(min..=max)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_float(&mut self, min: f32, max: f32) -> f32 {
        (**self).next_float(min, max)
    }
}

/// Deterministic generator for a run seed
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// Always answers the same value, clamped into the requested range
    #[derive(Debug, Clone, Copy)]
    pub struct FixedRandom(pub f32);

    impl RandomSource for FixedRandom {
        fn next_float(&mut self, min: f32, max: f32) -> f32 {
            self.0.clamp(min, max)
        }
    }
}
