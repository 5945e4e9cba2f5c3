//! Random source for every stochastic combat decision.
//!
//! The selector draw, cooldown durations, combo and dodge variants, strafe
//! direction, death variant and evaluation period all pull from one
//! [`RngOracle`]. Seeding it makes a whole fight reproducible.

use std::collections::VecDeque;

use crate::config::CooldownRange;

/// Stateful random source.
pub trait RngOracle {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform sample in `[0, 1)`.
    fn next_f32(&mut self) -> f32 {
        // 24 high bits fill the f32 mantissa exactly.
        (self.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Uniform index in `0..len`. Returns `0` for an empty range.
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_u32() as usize) % len
    }

    /// Uniform duration in seconds drawn from `range`.
    fn sample(&mut self, range: CooldownRange) -> f32 {
        range.lerp(self.next_f32())
    }
}

/// PCG-XSH-RR generator: 64-bit state, 32-bit output.
///
/// Deterministic for a given seed and cheap enough to give every world its own
/// instance.
#[derive(Clone, Debug)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator whose stream is fully determined by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            state: Self::avalanche(seed),
        }
    }

    // SplitMix64 finalizer so that nearby seeds start far apart.
    #[inline]
    fn avalanche(mut hash: u64) -> u64 {
        hash ^= hash >> 33;
        hash = hash.wrapping_mul(0xff51afd7ed558ccd);
        hash ^= hash >> 33;
        hash = hash.wrapping_mul(0xc4ceb9fe1a85ec53);
        hash ^ (hash >> 33)
    }

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }
}

/// Replays fixed draws, for tests and recorded fights.
///
/// Unit samples and integer draws come from separate queues; an exhausted
/// queue yields `0`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    floats: VecDeque<f32>,
    ints: VecDeque<u32>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues unit samples returned by [`RngOracle::next_f32`].
    #[must_use]
    pub fn with_floats(mut self, floats: impl IntoIterator<Item = f32>) -> Self {
        self.floats.extend(floats);
        self
    }

    /// Queues raw values returned by [`RngOracle::next_u32`] (and therefore
    /// by [`RngOracle::pick`]).
    #[must_use]
    pub fn with_ints(mut self, ints: impl IntoIterator<Item = u32>) -> Self {
        self.ints.extend(ints);
        self
    }

    pub fn push_float(&mut self, value: f32) {
        self.floats.push_back(value);
    }

    pub fn push_int(&mut self, value: u32) {
        self.ints.push_back(value);
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.ints.pop_front().unwrap_or(0)
    }

    fn next_f32(&mut self) -> f32 {
        self.floats.pop_front().unwrap_or(0.0)
    }
}
