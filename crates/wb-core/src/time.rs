//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter at a fixed logical rate
//! (`tick_hz`).  The simulation clock in seconds is derived from it:
//!
//!   now_secs = tick / tick_hz
//!
//! All squad timers (`pursue_until`, next-fire time, broadcast throttle) are
//! absolute comparisons against `now_secs`, never countdowns, so they stay
//! correct however many ticks the [`TickScheduler`] runs per host update.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps tick counts to simulation seconds.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Logical ticks per simulated second.
    pub tick_hz: f32,
    /// The current tick: advanced by [`SimClock::advance`] after each step.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_hz: f32) -> Self {
        Self { tick_hz: tick_hz.max(1e-4), current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Seconds of simulated time covered by one tick.
    #[inline]
    pub fn tick_secs(&self) -> f32 {
        1.0 / self.tick_hz
    }

    /// Simulation time in seconds at the current tick.
    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.current_tick.0 as f64 / self.tick_hz as f64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.now_secs())
    }
}

// ── TickScheduler ─────────────────────────────────────────────────────────────

/// Most ticks a single host update may run.  Ten minutes at the default 5 Hz.
pub const MAX_CATCH_UP_TICKS: u32 = 3_000;

/// Fixed-rate accumulator decoupling the logical tick rate from the host's
/// update rate.
///
/// Each host update adds `elapsed_secs * tick_hz` to the accumulator; every
/// whole unit in it is one due tick.  After a stall several ticks come due at
/// once and all of them run (catch-up), up to [`MAX_CATCH_UP_TICKS`] per
/// update; whole ticks beyond that are discarded.
#[derive(Clone, Debug)]
pub struct TickScheduler {
    tick_hz: f64,
    accum:   f64,
}

impl TickScheduler {
    pub fn new(tick_hz: f32) -> Self {
        Self { tick_hz: f64::from(tick_hz.max(1e-4)), accum: 0.0 }
    }

    /// Accumulate `elapsed_secs` and return how many ticks are now due.
    ///
    /// Negative or non-finite inputs are ignored.
    pub fn advance(&mut self, elapsed_secs: f64) -> u32 {
        if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
            self.accum += elapsed_secs * self.tick_hz;
        }
        let whole = self.accum.floor();
        self.accum -= whole;
        whole.min(f64::from(MAX_CATCH_UP_TICKS)) as u32
    }

    /// Fraction of the next tick already accumulated, in `[0, 1)`.
    #[inline]
    pub fn pending(&self) -> f64 {
        self.accum
    }

    /// Drop any partially accumulated time (used on world regeneration).
    pub fn reset(&mut self) {
        self.accum = 0.0;
    }
}
