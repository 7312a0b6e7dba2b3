//! Short-range repulsion among mobile squads.
//!
//! For each mobile squad the repulsion from every other mobile squad within
//! `separation_radius` is summed, each weighted by
//! `(radius - distance) / radius`.  Squads closer than `COINCIDENT_DIST`
//! contribute a random vector instead so stacked squads split apart.  A
//! non-negligible sum is normalised and scaled to
//! `separation_push_per_sec × dt`.
//!
//! All deltas are computed from one position snapshot and applied together
//! by the caller, so the result does not depend on processing order.

use wb_core::{Dice, SquadId, Vec2};
use wb_squad::Squad;

use crate::TickContext;

const COINCIDENT_DIST: f32 = 1e-3;
const MIN_PUSH_SQ: f32 = 1e-6;

/// Position deltas for every mobile squad that needs pushing.
///
/// Garrison squads neither push nor get pushed.
pub fn separation_deltas<D: Dice>(squads: &[Squad], ctx: &TickContext<'_>, dice: &mut D) -> Vec<(SquadId, Vec2)> {
    let radius = ctx.config.separation_radius;
    let step = ctx.config.separation_push_per_sec * ctx.dt;
    if radius <= 0.0 {
        return Vec::new();
    }

    let mobile: Vec<(SquadId, Vec2)> = squads
        .iter()
        .filter(|s| !s.is_garrison)
        .map(|s| (s.id, s.pos))
        .collect();

    let mut deltas = Vec::new();
    for &(id, pos) in &mobile {
        let mut push = Vec2::ZERO;
        for &(other, other_pos) in &mobile {
            if other == id {
                continue;
            }
            let d = pos - other_pos;
            let dist = d.length();
            if dist < COINCIDENT_DIST {
                push += dice.in_unit_disc();
            } else if dist < radius {
                push += d.normalized() * ((radius - dist) / radius);
            }
        }
        if push.length_sq() > MIN_PUSH_SQ {
            deltas.push((id, push.normalized() * step));
        }
    }
    deltas
}
