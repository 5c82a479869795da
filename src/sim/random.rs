//! Random integer sources for spawn rolls and spawn positions

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform integer generator
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. `bound == 0` yields 0.
    fn below(&mut self, bound: u32) -> u32;
}

impl RandomSource for Pcg32 {
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.random_range(0..bound)
    }
}

/// Seeded PCG generator, the default source
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed script of draws, each reduced modulo the requested bound.
///
/// Once the script runs out every draw returns `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    rolls: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: u32::MAX,
        }
    }

    /// Every draw returns `value` (mod bound)
    pub fn constant(value: u32) -> Self {
        Self {
            rolls: VecDeque::new(),
            fallback: value,
        }
    }

    pub fn push(&mut self, roll: u32) {
        self.rolls.push_back(roll);
    }

    pub fn with_fallback(mut self, value: u32) -> Self {
        self.fallback = value;
        self
    }
}

impl RandomSource for ScriptedRolls {
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        let roll = self.rolls.pop_front().unwrap_or(self.fallback);
        roll % bound
    }
}
