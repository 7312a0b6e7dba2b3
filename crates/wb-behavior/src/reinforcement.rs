//! Reactive behaviours: help requests after a death, and gunfire hearing.
//!
//! # Help requests
//!
//! When a squad dies, the nearest surviving squad (garrison or mobile)
//! becomes the caller if it is within `help_broadcast_radius` of the death.
//! With probability `help_request_prob` the caller broadcasts.  Each mobile
//! squad within `help_response_radius` of the death then accepts with its
//! persona's acceptance probability.
//!
//! # Hearing
//!
//! When the player fires, each mobile squad not already in combat and within
//! `hearing_radius` investigates with probability
//! `hearing_response_prob × persona modifier`.

use wb_core::{AiConfig, Dice, SquadId, Vec2};
use wb_squad::Squad;

/// The squad that will call for help after a death at `death_pos`.
///
/// Nearest squad wins; equal distances keep the lowest id.  `None` if no
/// squad is within `broadcast_radius`.
pub fn nominate_caller<'a>(
    squads: impl IntoIterator<Item = &'a Squad>,
    death_pos: Vec2,
    broadcast_radius: f32,
) -> Option<SquadId> {
    let mut best: Option<(SquadId, f32)> = None;
    for s in squads {
        let d = s.pos.distance(death_pos);
        let better = match best {
            None => true,
            Some((bid, bd)) => d < bd || (d == bd && s.id < bid),
        };
        if better {
            best = Some((s.id, d));
        }
    }
    best.filter(|&(_, d)| d <= broadcast_radius).map(|(id, _)| id)
}

/// Mobile squads that answer a help request centred on `request_pos`.
pub fn help_responders<'a, D: Dice>(
    squads: impl IntoIterator<Item = &'a Squad>,
    request_pos: Vec2,
    response_radius: f32,
    dice: &mut D,
) -> Vec<SquadId> {
    squads
        .into_iter()
        .filter(|s| !s.is_garrison && s.pos.distance(request_pos) <= response_radius)
        .filter(|s| dice.chance(s.persona.help_acceptance()))
        .map(|s| s.id)
        .collect()
}

/// Mobile squads that go to investigate a shot fired at `shot_pos`.
pub fn hearing_responders<'a, D: Dice>(
    squads: impl IntoIterator<Item = &'a Squad>,
    shot_pos: Vec2,
    cfg: &AiConfig,
    dice: &mut D,
) -> Vec<SquadId> {
    squads
        .into_iter()
        .filter(|s| !s.is_garrison && !s.in_combat && s.pos.distance(shot_pos) <= cfg.hearing_radius)
        .filter(|s| dice.chance(cfg.hearing_response_prob * s.persona.hearing_modifier()))
        .map(|s| s.id)
        .collect()
}
