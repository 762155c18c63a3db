//! A simple pseudorandom number generator.
//!
//! Specifically, a translation of the *really* minimal C PCG32 implementation from <https://www.pcg-random.org/>, implemented to satisfy the [RngCore] trait.[^note]
//!
//! Each [session](crate::sampler::Session) owns exactly one instance, seeded once from the [configuration](crate::config::Config), and every coin flip or solver seed of the session is drawn from it.
//! So, two sessions with the same configuration and formula make the same sequence of random choices.
//!
//! [^note]: At the time of writing, the C implementation is at the top of the [download page](https://www.pcg-random.org/download.html).

use rand::SeedableRng;
use rand_core::{impls, RngCore};

/// State and increment
#[derive(Clone, Debug, Default)]
pub struct MinimalPCG32 {
    state: u64,
    inc: u64,
}

impl RngCore for MinimalPCG32 {
    fn next_u32(&mut self) -> u32 {
        let old_state = self.state;

        self.state = old_state
            .wrapping_mul(6364136223846793005_u64)
            .wrapping_add(self.inc);

        let xorshifted = ((old_state >> 18) ^ old_state) >> 27;
        let rot = (old_state >> 59) as u32;
        (xorshifted as u32).rotate_right(rot)
    }

    /// Two outputs, high then low, so seeds drawn for solvers cover the full 64 bits.
    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }
}

impl SeedableRng for MinimalPCG32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        /// Entirely unmotivated.
        const INCREMENT: u64 = 3215534235932367344;
        Self {
            state: (u64::from_le_bytes(seed)).wrapping_add(INCREMENT),
            inc: INCREMENT,
        }
    }
}

impl MinimalPCG32 {
    /// A generator from a `u64` seed, as stored in a [config](crate::config::Config).
    pub fn from_u64(seed: u64) -> Self {
        Self::from_seed(seed.to_le_bytes())
    }
}

#[cfg(test)]
mod pcg_tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = MinimalPCG32::from_u64(73);
        let mut b = MinimalPCG32::from_u64(73);

        for _ in 0..64 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn distinct_seeds_diverge() {
        let mut a = MinimalPCG32::from_u64(2);
        let mut b = MinimalPCG32::from_u64(3);

        let a_stream = (0..8).map(|_| a.next_u64()).collect::<Vec<_>>();
        let b_stream = (0..8).map(|_| b.next_u64()).collect::<Vec<_>>();

        assert_ne!(a_stream, b_stream);
    }

    #[test]
    fn wide_outputs() {
        let mut rng = MinimalPCG32::from_u64(11);
        assert!((0..32).any(|_| rng.next_u64() > u32::MAX as u64));
    }
}
