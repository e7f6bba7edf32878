//! Randomness used by dispatch, wandering, and ratings.
//!
//! Everything random in the simulation goes through [`RandomSource`] so tests
//! can swap the seeded generator for a [`ScriptedRandom`] and pin exact
//! pickup points, coin flips, and ratings.

use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform integer in `[0, n)`. `n` must be non-zero.
    fn below(&mut self, n: u32) -> u32;

    /// Fair coin.
    fn coin_flip(&mut self) -> bool;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

/// Seeded generator stored as a world resource.
#[derive(Debug, Resource)]
pub struct SimRng(StdRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl RandomSource for SimRng {
    fn below(&mut self, n: u32) -> u32 {
        self.0.gen_range(0..n)
    }

    fn coin_flip(&mut self) -> bool {
        self.0.gen_bool(0.5)
    }

    fn unit(&mut self) -> f64 {
        self.0.gen()
    }
}

/// Replays queued values, then falls back to a seeded generator once a queue
/// runs dry.
///
/// Queued integers are reduced modulo the requested bound, so a script can be
/// written in grid coordinates directly.
#[derive(Debug)]
pub struct ScriptedRandom {
    integers: VecDeque<u32>,
    flips: VecDeque<bool>,
    units: VecDeque<f64>,
    fallback: SimRng,
}

impl Default for ScriptedRandom {
    fn default() -> Self {
        Self {
            integers: VecDeque::new(),
            flips: VecDeque::new(),
            units: VecDeque::new(),
            fallback: SimRng::seeded(0),
        }
    }
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_integers(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.integers.extend(values);
        self
    }

    pub fn with_flips(mut self, values: impl IntoIterator<Item = bool>) -> Self {
        self.flips.extend(values);
        self
    }

    pub fn with_units(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(values);
        self
    }

    /// Values still waiting to be replayed, as `(integers, flips, units)`.
    pub fn remaining(&self) -> (usize, usize, usize) {
        (self.integers.len(), self.flips.len(), self.units.len())
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&mut self, n: u32) -> u32 {
        match self.integers.pop_front() {
            Some(value) => value % n,
            None => self.fallback.below(n),
        }
    }

    fn coin_flip(&mut self) -> bool {
        match self.flips.pop_front() {
            Some(value) => value,
            None => self.fallback.coin_flip(),
        }
    }

    fn unit(&mut self) -> f64 {
        match self.units.pop_front() {
            Some(value) => value,
            None => self.fallback.unit(),
        }
    }
}
