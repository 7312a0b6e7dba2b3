//! Per-region admission cap for mobile squads.

use std::collections::BTreeMap;

use tracing::debug;

use wb_core::{Dice, NodeId, RegionId, SquadId};
use wb_squad::Squad;

use crate::TickContext;

/// Send `squad` out of over-full `region` toward `destination`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub squad:       SquadId,
    pub region:      RegionId,
    pub destination: NodeId,
}

/// Pick the squads to move out of every region holding more than
/// `max_mobile_per_region` mobile squads.
///
/// Squads are bucketed by their `region` field, which the caller refreshes
/// before calling.  Within a region the first `max_mobile_per_region` squads
/// in slice order stay; each excess squad is sent to a random destination
/// outside the region.  Squads in an unknown region are left alone, as are
/// excess squads when no destination exists outside their region.
pub fn plan_redirects<D: Dice>(squads: &[Squad], ctx: &TickContext<'_>, dice: &mut D) -> Vec<Redirect> {
    let cap = ctx.config.max_mobile_per_region;

    let mut by_region: BTreeMap<RegionId, Vec<SquadId>> = BTreeMap::new();
    for s in squads.iter().filter(|s| !s.is_garrison && s.region.is_valid()) {
        by_region.entry(s.region).or_default().push(s.id);
    }

    let mut redirects = Vec::new();
    for (region, members) in by_region {
        if members.len() <= cap {
            continue;
        }
        let outside = ctx.graph.destinations_outside(region);
        if outside.is_empty() {
            debug!(%region, count = members.len(), "region over cap with nowhere to send squads");
            continue;
        }
        for &squad in &members[cap..] {
            if let Some(&destination) = dice.choose(&outside) {
                redirects.push(Redirect { squad, region, destination });
            }
        }
    }
    redirects
}
