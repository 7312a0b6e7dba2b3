//! Read-only inputs shared by every decision within one tick.

use wb_core::{AiConfig, Vec2};
use wb_world::WorldGraph;

/// A read-only snapshot of the inputs of one tick.
///
/// Built once per tick by `wb-sim` and passed to every decision function.
pub struct TickContext<'a> {
    /// Simulation time in seconds at the start of the tick.
    pub now: f64,
    /// Seconds of simulated time covered by one tick.
    pub dt: f32,
    /// Player position polled at the start of the tick.
    pub player: Vec2,
    pub graph: &'a WorldGraph,
    pub config: &'a AiConfig,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(now: f64, player: Vec2, graph: &'a WorldGraph, config: &'a AiConfig) -> Self {
        Self { now, dt: config.tick_secs(), player, graph, config }
    }
}
