//! Tick-level observer hooks for hosts, tests, and diagnostics.

use wb_core::Tick;

/// Aggregate counters for one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick:        Tick,
    /// Shots fired (hits and misses), never above `max_shots_per_tick`.
    pub shots_fired: u32,
    pub hits:        u32,
    /// Mobile squads engaging through chaser admission, never above
    /// `max_chasers`.
    pub engaged:     usize,
    /// Garrison squads with the player inside their detection radius.
    pub garrisons_engaged: usize,
    /// Squads sent out of an over-full region.
    pub redirected:  usize,
}

/// Callbacks invoked by [`Sim::step`][crate::Sim::step] around each tick.
///
/// All methods have default no-op implementations.
///
/// # Example: shot counter
///
/// ```rust,ignore
/// struct ShotCounter(u32);
///
/// impl SimObserver for ShotCounter {
///     fn on_tick_end(&mut self, report: &TickReport) {
///         self.0 += report.shots_fired;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before any squad is evaluated.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after separation and movement broadcasts.
    fn on_tick_end(&mut self, _report: &TickReport) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
