//! Deterministic per-walker RNG.
//!
//! Each walker owns a `SmallRng` seeded by
//!
//!   seed = global_seed XOR (walker_index * MIXING_CONSTANT)
//!
//! so two walkers of the same run never share a stream, and adding a walker
//! leaves the choices of the existing ones unchanged.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct WalkRng(SmallRng);

impl WalkRng {
    pub fn new(global_seed: u64, walker: u32) -> Self {
        let seed = global_seed ^ (walker as u64).wrapping_mul(MIXING_CONSTANT);
        WalkRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform pick from `slice`; `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }
}
