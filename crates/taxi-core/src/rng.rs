//! Deterministic per-actor RNG.
//!
//! Each actor task gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (actor_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive actor IDs uniformly across the seed space.
//! Actors never share RNG state, so there is no contention and the jitter
//! each task sleeps between polls is reproducible for a given global seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ActorId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-actor deterministic RNG.
///
/// The type is `!Sync`; each actor task owns exactly one.
pub struct ActorRng(SmallRng);

impl ActorRng {
    /// Seed deterministically from the run's global seed and an actor ID.
    pub fn new(global_seed: u64, actor: ActorId) -> Self {
        let seed = global_seed ^ (actor.0 as u64).wrapping_mul(MIXING_CONSTANT);
        ActorRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// A randomized poll interval in `1..=max_minutes` simulated minutes.
    #[inline]
    pub fn jitter_minutes(&mut self, max_minutes: u32) -> u32 {
        self.0.gen_range(1..=max_minutes.max(1))
    }
}
