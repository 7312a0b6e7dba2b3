//! Control-core tunables.
//!
//! Typically built with `AiConfig::default()` and selectively overridden, or
//! loaded from JSON by the host (with the `serde` feature) and passed to
//! `SimBuilder`.

use crate::{CoreError, CoreResult};

/// Every tunable of the squad control core.
///
/// Distances are in map units, durations in simulated seconds, speeds in map
/// units per second.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiConfig {
    /// Master RNG seed.  The same seed and inputs replay the same run.
    pub seed: u64,

    // ── Tick ──────────────────────────────────────────────────────────────
    /// Logical simulation ticks per simulated second.
    pub tick_hz: f32,

    // ── Engage / pursue ───────────────────────────────────────────────────
    pub pursue_secs_cowardly:   f32,
    pub pursue_secs_neutral:    f32,
    pub pursue_secs_aggressive: f32,
    /// Distance at which an engaged squad stops closing and starts circling.
    pub stand_off_radius: f32,
    /// Fraction of `speed` used while closing on the player.
    pub approach_speed_factor: f32,
    /// Fraction of `speed` used for lateral strafing inside stand-off.
    pub strafe_lateral_factor: f32,
    /// Random jitter added to strafing, units per second.
    pub strafe_jitter: f32,
    /// Probability that a cowardly squad inside `0.8 × stand_off_radius`
    /// breaks off and retreats.
    pub coward_retreat_prob: f32,

    // ── Separation ────────────────────────────────────────────────────────
    pub separation_radius: f32,
    pub separation_push_per_sec: f32,

    // ── Shooting ──────────────────────────────────────────────────────────
    /// Seconds between a squad's shots, drawn uniformly per shot.
    pub shot_interval_secs: (f32, f32),
    pub hit_chance: f32,
    /// Inclusive base damage range, scaled by firepower and difficulty.
    pub base_damage: (i32, i32),
    /// Global difficulty multiplier applied to every hit.
    pub damage_multiplier: f32,
    /// Maximum shots fired across all squads in one tick.
    pub max_shots_per_tick: u32,
    /// Upper bound of the random delay before a squad's first shot.
    pub initial_stagger_secs: f32,

    // ── Admission caps ────────────────────────────────────────────────────
    /// Maximum mobile squads per region before the excess is redirected.
    pub max_mobile_per_region: usize,
    /// Maximum mobile squads engaging the player at once.
    pub max_chasers: usize,

    // ── Reinforcement ─────────────────────────────────────────────────────
    /// A dead squad's nearest neighbour only calls for help within this range.
    pub help_broadcast_radius: f32,
    pub help_response_radius: f32,
    pub help_pursue_secs: f32,
    /// Probability that the nominated caller actually broadcasts.
    pub help_request_prob: f32,

    // ── Heard shots ───────────────────────────────────────────────────────
    pub hearing_radius: f32,
    /// Base response probability, scaled by persona.
    pub hearing_response_prob: f32,
    pub investigate_secs: f32,

    // ── Patrol & resupply ─────────────────────────────────────────────────
    /// Probability a new patrol target is drawn from the city pool.
    pub city_target_bias: f32,
    pub resupply_prob: f32,
    /// Probability a resupply delivers ammo rather than meds.
    pub resupply_ammo_bias: f32,
    pub resupply_ammo: (i32, i32),
    pub resupply_meds: (i32, i32),

    // ── Movement notifications ────────────────────────────────────────────
    /// Maximum `SquadMoved` notifications per squad per second.
    pub movement_broadcast_hz: f32,
    /// Displacement below which a tick's movement is not broadcast.
    pub movement_broadcast_min_dist: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_hz: 5.0,

            pursue_secs_cowardly:   3.0,
            pursue_secs_neutral:    7.0,
            pursue_secs_aggressive: 12.0,
            stand_off_radius:       250.0,
            approach_speed_factor:  0.6,
            strafe_lateral_factor:  0.45,
            strafe_jitter:          8.0,
            coward_retreat_prob:    0.70,

            separation_radius:       100.0,
            separation_push_per_sec: 250.0,

            shot_interval_secs:   (1.2, 2.2),
            hit_chance:           0.35,
            base_damage:          (4, 9),
            damage_multiplier:    1.0,
            max_shots_per_tick:   2,
            initial_stagger_secs: 0.7,

            max_mobile_per_region: 5,
            max_chasers:           5,

            help_broadcast_radius: 2500.0,
            help_response_radius:  2500.0,
            help_pursue_secs:      12.0,
            help_request_prob:     0.70,

            hearing_radius:        2200.0,
            hearing_response_prob: 0.50,
            investigate_secs:      8.0,

            city_target_bias:   0.70,
            resupply_prob:      0.25,
            resupply_ammo_bias: 0.60,
            resupply_ammo:      (6, 14),
            resupply_meds:      (1, 3),

            movement_broadcast_hz:       3.0,
            movement_broadcast_min_dist: 0.5,
        }
    }
}

impl AiConfig {
    /// Seconds of simulated time per tick.
    #[inline]
    pub fn tick_secs(&self) -> f32 {
        1.0 / self.tick_hz.max(1e-4)
    }

    /// Reject values the control core cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(CoreError::Config(format!("tick_hz must be positive, got {}", self.tick_hz)));
        }
        let (lo, hi) = self.shot_interval_secs;
        if !(lo > 0.0 && lo <= hi) {
            return Err(CoreError::Config(format!("shot_interval_secs must satisfy 0 < lo <= hi, got ({lo}, {hi})")));
        }
        for (name, (lo, hi)) in [
            ("base_damage", self.base_damage),
            ("resupply_ammo", self.resupply_ammo),
            ("resupply_meds", self.resupply_meds),
        ] {
            if lo > hi || lo < 0 {
                return Err(CoreError::Config(format!("{name} must satisfy 0 <= lo <= hi, got ({lo}, {hi})")));
            }
        }
        for (name, p) in [
            ("coward_retreat_prob", self.coward_retreat_prob),
            ("hit_chance", self.hit_chance),
            ("help_request_prob", self.help_request_prob),
            ("hearing_response_prob", self.hearing_response_prob),
            ("city_target_bias", self.city_target_bias),
            ("resupply_prob", self.resupply_prob),
            ("resupply_ammo_bias", self.resupply_ammo_bias),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(CoreError::Config(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        if self.separation_radius <= 0.0 {
            return Err(CoreError::Config("separation_radius must be positive".into()));
        }
        Ok(())
    }
}
