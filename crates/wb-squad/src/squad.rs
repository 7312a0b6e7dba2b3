//! The squad entity.

use std::fmt;

use wb_core::{NodeId, RegionId, SquadId, Vec2};

use crate::Persona;

/// Default movement speed for squads built without a spawner.
pub const DEFAULT_SPEED: f32 = 250.0;
/// Default detection radius for squads built without a spawner.
pub const DEFAULT_DETECTION_RADIUS: f32 = 1500.0;

// ── AiState ───────────────────────────────────────────────────────────────────

/// Control state.  Exactly one per squad at any time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiState {
    #[default]
    Idle,
    Patrol,
    Engage,
    Pursue,
    Return,
}

impl fmt::Display for AiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── PathStep ──────────────────────────────────────────────────────────────────

/// Outcome of one [`Squad::advance_along_path`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PathStep {
    /// No waypoints remain.
    NoPath,
    /// Moved toward the current waypoint without reaching it.
    Moving,
    /// Snapped onto an intermediate waypoint.
    Waypoint,
    /// Snapped onto the final waypoint; the path is now exhausted.
    Arrived,
}

// ── Squad ─────────────────────────────────────────────────────────────────────

/// One NPC squad.
///
/// Owned exclusively by [`SquadRegistry`](crate::SquadRegistry); `id` is
/// assigned on insertion.  The waypoint list and its cursor are private so
/// `path_index <= path.len()` holds at all times.
#[derive(Clone, Debug)]
pub struct Squad {
    pub id:       SquadId,
    /// Display name used by every narrative notification.
    pub callsign: String,
    pub pos:      Vec2,
    /// Last known region, refreshed every tick.
    pub region:   RegionId,
    pub persona:  Persona,

    /// `true` for node-anchored squads that never move.
    pub is_garrison: bool,
    /// Anchor node of a garrison squad; `None` for mobile squads.
    pub anchor:      Option<NodeId>,

    pub detection_radius: f32,
    pub speed:            f32,
    pub firepower:        f32,

    pub state:  AiState,
    /// Node a mobile squad is travelling toward.
    pub target: Option<NodeId>,
    path:       Vec<Vec2>,
    path_index: usize,

    /// Absolute sim time (seconds) at which a timed pursuit ends.
    pub pursue_until: f64,
    /// `true` while engaging the player this tick.
    pub in_combat:    bool,

    /// Absolute sim time of the next allowed shot; `None` until first armed.
    pub next_fire_at:         Option<f64>,
    /// Sim time of the last published movement notification.
    pub last_moved_broadcast: Option<f64>,
}

impl Squad {
    fn new(callsign: String, pos: Vec2, region: RegionId, persona: Persona) -> Self {
        Self {
            id: SquadId::INVALID,
            callsign,
            pos,
            region,
            persona,
            is_garrison: false,
            anchor: None,
            detection_radius: DEFAULT_DETECTION_RADIUS,
            speed: DEFAULT_SPEED,
            firepower: 1.0,
            state: AiState::Idle,
            target: None,
            path: Vec::new(),
            path_index: 0,
            pursue_until: 0.0,
            in_combat: false,
            next_fire_at: None,
            last_moved_broadcast: None,
        }
    }

    /// A mobile squad at `pos`.
    pub fn mobile(callsign: impl Into<String>, pos: Vec2, region: RegionId, persona: Persona) -> Self {
        Self::new(callsign.into(), pos, region, persona)
    }

    /// A garrison squad anchored to `anchor`.  Garrisons are always neutral.
    pub fn garrison(callsign: impl Into<String>, anchor: NodeId, pos: Vec2, region: RegionId) -> Self {
        let mut s = Self::new(callsign.into(), pos, region, Persona::Neutral);
        s.is_garrison = true;
        s.anchor = Some(anchor);
        s.target = Some(anchor);
        s
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_detection_radius(mut self, radius: f32) -> Self {
        self.detection_radius = radius;
        self
    }

    pub fn with_firepower(mut self, firepower: f32) -> Self {
        self.firepower = firepower;
        self
    }

    // ── Path cursor ───────────────────────────────────────────────────────

    #[inline]
    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    #[inline]
    pub fn path_index(&self) -> usize {
        self.path_index
    }

    /// `true` if at least one waypoint remains.
    #[inline]
    pub fn has_path(&self) -> bool {
        self.path_index < self.path.len()
    }

    /// Waypoint currently being approached.
    #[inline]
    pub fn current_waypoint(&self) -> Option<Vec2> {
        self.path.get(self.path_index).copied()
    }

    /// Replace the path and rewind the cursor.
    pub fn set_path(&mut self, path: Vec<Vec2>) {
        self.path = path;
        self.path_index = 0;
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
        self.path_index = 0;
    }

    /// Move up to `step` units along the path.
    ///
    /// Snaps onto the current waypoint when it is within `step`; otherwise
    /// moves `step` units straight toward it.  Garrison squads never move.
    pub fn advance_along_path(&mut self, step: f32) -> PathStep {
        if self.is_garrison {
            return PathStep::NoPath;
        }
        let Some(wp) = self.current_waypoint() else {
            return PathStep::NoPath;
        };
        let to = wp - self.pos;
        if to.length() <= step {
            self.pos = wp;
            self.path_index += 1;
            if self.has_path() { PathStep::Waypoint } else { PathStep::Arrived }
        } else {
            self.pos += to.normalized() * step;
            PathStep::Moving
        }
    }

    /// Move `step` units straight toward `point`, never overshooting it.
    pub fn step_toward(&mut self, point: Vec2, step: f32) {
        if self.is_garrison {
            return;
        }
        let to = point - self.pos;
        if to.length() <= step {
            self.pos = point;
        } else {
            self.pos += to.normalized() * step;
        }
    }
}
