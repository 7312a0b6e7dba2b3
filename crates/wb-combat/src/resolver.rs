//! Per-squad fire control and hit resolution.
//!
//! # Fire timing
//!
//! Each squad owns an absolute next-fire timestamp (`Squad::next_fire_at`).
//! It is armed on the first attempt to `now + U(0, initial_stagger)` so
//! squads that engage together do not volley together.  An attempt fires
//! only when `now >= next_fire_at`; firing immediately re-arms the timer at
//! `now + U(shot_interval)`, clamped to `[0.05, 99]` seconds.
//!
//! # Damage
//!
//! `round(U{base_damage} × max(0.1, firepower) × max(0.1, multiplier))`,
//! floored at 1.

use tracing::trace;

use wb_core::{AiConfig, Dice};
use wb_squad::Squad;

use crate::ShotBudget;

const MIN_INTERVAL_SECS: f32 = 0.05;
const MAX_INTERVAL_SECS: f32 = 99.0;

/// Result of one fire attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The tick's shot budget was already spent; nothing happened.
    Capped,
    /// The squad's fire timer has not elapsed.
    NotReady,
    Miss,
    /// Hit for the given damage.
    Hit(i32),
}

impl ShotOutcome {
    /// `true` if a shot was actually fired (hit or miss).
    #[inline]
    pub fn fired(self) -> bool {
        matches!(self, ShotOutcome::Miss | ShotOutcome::Hit(_))
    }
}

/// Stateless combat rules; all mutable state lives on the squad.
#[derive(Clone, Debug)]
pub struct CombatResolver {
    pub shot_interval_secs:   (f32, f32),
    pub hit_chance:           f32,
    pub base_damage:          (i32, i32),
    pub damage_multiplier:    f32,
    pub initial_stagger_secs: f32,
}

impl CombatResolver {
    pub fn from_config(cfg: &AiConfig) -> Self {
        Self {
            shot_interval_secs:   cfg.shot_interval_secs,
            hit_chance:           cfg.hit_chance,
            base_damage:          cfg.base_damage,
            damage_multiplier:    cfg.damage_multiplier,
            initial_stagger_secs: cfg.initial_stagger_secs,
        }
    }

    /// Attempt one shot from `squad` at time `now`, charged to `budget`.
    pub fn attempt<D: Dice>(
        &self,
        budget: &mut ShotBudget,
        squad: &mut Squad,
        now: f64,
        dice: &mut D,
    ) -> ShotOutcome {
        if !budget.has_room() {
            return ShotOutcome::Capped;
        }
        let outcome = self.try_fire(squad, now, dice);
        if outcome.fired() {
            budget.consume();
        }
        outcome
    }

    /// Attempt one shot ignoring any budget.
    pub fn try_fire<D: Dice>(&self, squad: &mut Squad, now: f64, dice: &mut D) -> ShotOutcome {
        let next = *squad
            .next_fire_at
            .get_or_insert_with(|| now + dice.range_f32(0.0, self.initial_stagger_secs.max(0.0)) as f64);
        if now < next {
            return ShotOutcome::NotReady;
        }

        let (lo, hi) = self.shot_interval_secs;
        let interval = dice.range_f32(lo, hi).clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS);
        squad.next_fire_at = Some(now + interval as f64);

        if !dice.chance(self.hit_chance) {
            trace!(squad = %squad.id, "shot missed");
            return ShotOutcome::Miss;
        }
        let damage = self.roll_damage(squad.firepower, dice);
        trace!(squad = %squad.id, damage, "shot hit");
        ShotOutcome::Hit(damage)
    }

    /// Damage of one hit from a squad with `firepower`.
    pub fn roll_damage<D: Dice>(&self, firepower: f32, dice: &mut D) -> i32 {
        let (lo, hi) = self.base_damage;
        let base = dice.range_i32(lo, hi) as f32;
        let scaled = base * firepower.max(0.1) * self.damage_multiplier.max(0.1);
        (scaled.round() as i32).max(1)
    }
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self::from_config(&AiConfig::default())
    }
}
