//! World population: garrison rings and roaming mobile squads.
//!
//! # Garrisons
//!
//! Each destination node with a non-zero garrison count gets that many
//! squads spread evenly on a ring around it (radius `garrison_ring_radius`,
//! scaled by `camp_ring_factor` for camps), each with ±10° angular jitter.
//! A squad landing closer than `garrison_min_separation` to a sibling at the
//! same anchor is nudged up to 30 times.  Callsigns are `<node>-<n>` with a
//! number in 1..=30 unique per anchor.
//!
//! # Mobile squads
//!
//! Spawned within `mobile_spawn_radius` of a random city (probability
//! `city_spawn_bias`) or camp, with a rolled persona and persona-scaled
//! firepower.  Callsigns come from `callsign_bank`, falling back to
//! `Hostile-<100..999>`.

use tracing::{debug, warn};

use wb_core::{Dice, NodeId, SquadId, Vec2};
use wb_world::{NodeKind, WorldGraph};

use crate::{Persona, Squad, SquadError, SquadRegistry, SquadResult};

const ANGLE_JITTER_DEG: i32 = 10;
const NUDGE_TRIES: usize = 30;
const NUDGE_STEP: f32 = 6.0;
const GARRISON_NUMBERS: i32 = 30;
const NUMBER_TRIES: usize = 64;

// ── SpawnConfig ───────────────────────────────────────────────────────────────

/// World-population tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnConfig {
    pub mobile_squads: usize,
    pub garrison_ring_radius: f32,
    pub camp_ring_factor: f32,
    /// Minimum distance between garrison squads of one anchor (at least 10).
    pub garrison_min_separation: f32,
    pub speed_range: (f32, f32),
    pub detection_radius: f32,
    /// Relative weights of cowardly, neutral, aggressive.
    pub persona_weights: [u32; 3],
    /// Firepower multiplier by persona (cowardly, neutral, aggressive).
    pub firepower: [f32; 3],
    pub mobile_spawn_radius: f32,
    pub city_spawn_bias: f32,
    /// Names handed to mobile squads before the numbered fallback.
    pub callsign_bank: Vec<String>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            mobile_squads:           6,
            garrison_ring_radius:    120.0,
            camp_ring_factor:        0.8,
            garrison_min_separation: 35.0,
            speed_range:             (220.0, 280.0),
            detection_radius:        1500.0,
            persona_weights:         [30, 40, 30],
            firepower:               [0.8, 1.0, 1.2],
            mobile_spawn_radius:     50.0,
            city_spawn_bias:         0.70,
            callsign_bank:           Vec::new(),
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> SquadResult<()> {
        let (lo, hi) = self.speed_range;
        if !(lo >= 0.0 && lo <= hi) {
            return Err(SquadError::Config(format!("speed_range must satisfy 0 <= lo <= hi, got ({lo}, {hi})")));
        }
        if self.detection_radius < 0.0 || self.garrison_ring_radius < 0.0 || self.mobile_spawn_radius < 0.0 {
            return Err(SquadError::Config("radii must be non-negative".into()));
        }
        if !(0.0..=1.0).contains(&self.city_spawn_bias) {
            return Err(SquadError::Config(format!("city_spawn_bias must be in [0, 1], got {}", self.city_spawn_bias)));
        }
        Ok(())
    }
}

// ── SquadSpawner ──────────────────────────────────────────────────────────────

/// Populates a [`SquadRegistry`] from a freshly built world.
pub struct SquadSpawner<'a> {
    config: &'a SpawnConfig,
}

impl<'a> SquadSpawner<'a> {
    pub fn new(config: &'a SpawnConfig) -> Self {
        Self { config }
    }

    /// Spawn every garrison, then `mobile_squads` mobile squads.
    ///
    /// Returns the new ids in spawn order.
    pub fn populate<D: Dice>(
        &self,
        registry: &mut SquadRegistry,
        graph: &WorldGraph,
        dice: &mut D,
    ) -> SquadResult<Vec<SquadId>> {
        self.config.validate()?;
        let mut spawned = Vec::new();
        for node in graph.live_nodes().collect::<Vec<_>>() {
            self.spawn_garrison(registry, graph, node, dice, &mut spawned)?;
        }
        for _ in 0..self.config.mobile_squads {
            match self.spawn_mobile(registry, graph, dice)? {
                Some(id) => spawned.push(id),
                None => {
                    warn!("no city or camp to spawn mobile squads at");
                    break;
                }
            }
        }
        debug!(count = spawned.len(), "world populated");
        Ok(spawned)
    }

    fn spawn_garrison<D: Dice>(
        &self,
        registry: &mut SquadRegistry,
        graph: &WorldGraph,
        node: NodeId,
        dice: &mut D,
        spawned: &mut Vec<SquadId>,
    ) -> SquadResult<()> {
        let i = node.index();
        let kind = graph.node_kind[i];
        let count = graph.node_garrison[i] as usize;
        if count == 0 || !kind.is_destination() {
            return Ok(());
        }
        let center = graph.node_pos[i];
        let radius = if kind == NodeKind::Camp {
            self.config.garrison_ring_radius * self.config.camp_ring_factor
        } else {
            self.config.garrison_ring_radius
        };
        let sep_sq = self.config.garrison_min_separation.max(10.0).powi(2);
        let angle_step = 360.0 / count.max(1) as f32;

        let mut placed: Vec<Vec2> = Vec::with_capacity(count);
        let mut used_numbers: Vec<i32> = Vec::with_capacity(count);
        for k in 0..count {
            let callsign = garrison_callsign(registry, &graph.node_name[i], &mut used_numbers, dice);

            let jitter = dice.range_i32(-ANGLE_JITTER_DEG, ANGLE_JITTER_DEG) as f32;
            let angle = (angle_step * k as f32 + jitter).to_radians();
            let mut pos = center + Vec2::from_angle(angle) * radius;
            for _ in 0..NUDGE_TRIES {
                if !placed.iter().any(|p| p.distance_sq(pos) < sep_sq) {
                    break;
                }
                pos += dice.in_unit_disc() * NUDGE_STEP;
            }
            placed.push(pos);

            let squad = Squad::garrison(callsign, node, pos, graph.node_region[i])
                .with_speed(self.roll_speed(dice))
                .with_detection_radius(self.config.detection_radius);
            spawned.push(registry.insert(squad)?);
        }
        Ok(())
    }

    fn spawn_mobile<D: Dice>(
        &self,
        registry: &mut SquadRegistry,
        graph: &WorldGraph,
        dice: &mut D,
    ) -> SquadResult<Option<SquadId>> {
        let cities = graph.city_pool();
        let camps = graph.camp_pool();
        let from_city = dice.chance(self.config.city_spawn_bias) || camps.is_empty();
        let pool = if from_city && !cities.is_empty() { &cities } else { &camps };
        let Some(&src) = dice.choose(pool) else {
            return Ok(None);
        };

        let pos = graph.node_pos[src.index()] + dice.in_unit_disc() * self.config.mobile_spawn_radius;
        let persona = Persona::roll(dice, self.config.persona_weights);
        let callsign = self.mobile_callsign(registry, dice);
        let squad = Squad::mobile(callsign, pos, graph.node_region[src.index()], persona)
            .with_firepower(self.config.firepower[persona.index()])
            .with_speed(self.roll_speed(dice))
            .with_detection_radius(self.config.detection_radius);
        registry.insert(squad).map(Some)
    }

    fn roll_speed<D: Dice>(&self, dice: &mut D) -> f32 {
        let (lo, hi) = self.config.speed_range;
        dice.range_f32(lo, hi)
    }

    fn mobile_callsign<D: Dice>(&self, registry: &SquadRegistry, dice: &mut D) -> String {
        let free: Vec<&String> = self
            .config
            .callsign_bank
            .iter()
            .filter(|c| !registry.has_callsign(c))
            .collect();
        if let Some(name) = dice.choose(&free) {
            return (*name).clone();
        }
        for _ in 0..NUMBER_TRIES {
            let name = format!("Hostile-{}", dice.range_i32(100, 999));
            if !registry.has_callsign(&name) {
                return name;
            }
        }
        (1000..)
            .map(|n| format!("Hostile-{n}"))
            .find(|name| !registry.has_callsign(name))
            .unwrap_or_default()
    }
}

/// `<node>-<n>` with `n` in 1..=30, unique among this anchor's garrison.
///
/// Past 30 squads (or after repeated collisions) numbering continues
/// sequentially from 31.
fn garrison_callsign<D: Dice>(
    registry: &SquadRegistry,
    node_name: &str,
    used: &mut Vec<i32>,
    dice: &mut D,
) -> String {
    let free = |n: i32, used: &[i32]| !used.contains(&n) && !registry.has_callsign(&format!("{node_name}-{n}"));
    let mut number = None;
    for _ in 0..NUMBER_TRIES {
        let n = dice.range_i32(1, GARRISON_NUMBERS);
        if free(n, used.as_slice()) {
            number = Some(n);
            break;
        }
    }
    let n = number.unwrap_or_else(|| {
        (GARRISON_NUMBERS + 1..).find(|&n| free(n, used.as_slice())).unwrap_or(i32::MAX)
    });
    used.push(n);
    format!("{node_name}-{n}")
}
