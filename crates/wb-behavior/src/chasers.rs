//! Chaser admission.
//!
//! At most `max_chasers` mobile squads may engage the player at once.  The
//! admitted set is the nearest detecting squads, ordered by distance with
//! ties broken by ascending `SquadId`, so registry order never decides who
//! gets in.  A detecting squad outside the set is turned away for the tick.

use rustc_hash::FxHashSet;

use wb_core::{SquadId, Vec2};
use wb_squad::Squad;

/// Mobile squads admitted to engage the player this tick.
#[derive(Clone, Debug, Default)]
pub struct ChaserSet {
    /// Admitted ids, nearest first.
    ordered: Vec<SquadId>,
    members: FxHashSet<SquadId>,
}

impl ChaserSet {
    /// Admit the `max_chasers` nearest mobile squads that have the player
    /// within their own detection radius.
    pub fn admit<'a>(squads: impl IntoIterator<Item = &'a Squad>, player: Vec2, max_chasers: usize) -> Self {
        let mut candidates: Vec<(f32, SquadId)> = squads
            .into_iter()
            .filter(|s| !s.is_garrison)
            .map(|s| (s.pos.distance(player), s))
            .filter(|(d, s)| *d <= s.detection_radius)
            .map(|(d, s)| (d, s.id))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        candidates.truncate(max_chasers);

        let ordered: Vec<SquadId> = candidates.into_iter().map(|(_, id)| id).collect();
        let members = ordered.iter().copied().collect();
        Self { ordered, members }
    }

    #[inline]
    pub fn contains(&self, id: SquadId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Admitted ids, nearest first.
    pub fn ids(&self) -> &[SquadId] {
        &self.ordered
    }
}
