//! Seedable random source threaded through the simulation.
//!
//! # Determinism strategy
//!
//! Every random decision in the control core (retreat rolls, hit rolls,
//! target choice, strafe jitter, …) draws from one [`Dice`] owned by the
//! simulation context.  Production code uses [`SimRng`], a `SmallRng`
//! seeded from the run's seed, so the same seed and the same inputs replay
//! the same run.  Tests substitute [`FixedDice`] to force a branch: a dice
//! pinned at `0.0` makes every probability check succeed, one pinned just
//! below `1.0` makes every check fail.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Vec2;

/// Source of randomness for every decision in the control core.
///
/// Only [`unit`](Self::unit) is required; the other draws are derived from
/// it so a scripted implementation controls every outcome.
pub trait Dice {
    /// Uniform value in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// `true` with probability `p` (clamped to `[0, 1]`).
    #[inline]
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p.clamp(0.0, 1.0)
    }

    /// Uniform `f32` in `[lo, hi)`; returns `lo` when the range is empty.
    #[inline]
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.unit()
    }

    /// Uniform integer in `[lo, hi]` (inclusive, either order).
    fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let span = (hi - lo + 1) as f32;
        let offset = (self.unit() * span) as i32;
        lo + offset.min(hi - lo)
    }

    /// Uniform index in `0..len`.  `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() on an empty range");
        ((self.unit() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Uniform point inside the unit disc.
    fn in_unit_disc(&mut self) -> Vec2 {
        let r = self.unit().sqrt();
        let theta = self.unit() * std::f32::consts::TAU;
        Vec2::from_angle(theta) * r
    }

    /// Choose a random element from a slice.  Returns `None` if empty.
    fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if slice.is_empty() {
            None
        } else {
            slice.get(self.index(slice.len()))
        }
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG.
///
/// Used only from the single simulation thread.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }
}

impl Dice for SimRng {
    #[inline]
    fn unit(&mut self) -> f32 {
        self.0.r#gen::<f32>()
    }

    #[inline]
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..hi)
    }

    #[inline]
    fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.0.gen_range(lo..=hi)
    }

    #[inline]
    fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len.max(1))
    }
}

// ── FixedDice ─────────────────────────────────────────────────────────────────

/// A [`Dice`] that returns the same unit value for every roll.
///
/// `FixedDice::always(0.0)` passes every probability check and picks the
/// first element of every choice; `FixedDice::never()` fails every check.
#[derive(Clone, Debug)]
pub struct FixedDice {
    value: f32,
}

impl FixedDice {
    /// Every roll yields `value`, clamped into `[0, 1)`.
    pub fn always(value: f32) -> Self {
        Self { value: value.clamp(0.0, 0.999_999) }
    }

    /// Every probability check fails (for any `p < 1`).
    pub fn never() -> Self {
        Self::always(0.999_999)
    }
}

impl Dice for FixedDice {
    #[inline]
    fn unit(&mut self) -> f32 {
        self.value
    }
}
