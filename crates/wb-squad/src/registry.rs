//! Authoritative squad collection.
//!
//! Squads are stored in a `Vec` kept in ascending `SquadId` order.  Ids are
//! allocated sequentially and never reused, so appending preserves the
//! order and lookup is a binary search.  Removal shifts the tail down but
//! keeps the order, so iteration order is always ascending id.

use rustc_hash::FxHashSet;
use tracing::trace;

use wb_core::{NodeId, SquadId, Vec2};

use crate::{Squad, SquadError, SquadResult};

#[derive(Default)]
pub struct SquadRegistry {
    squads:    Vec<Squad>,
    callsigns: FxHashSet<String>,
    next_id:   u32,
}

impl SquadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `squad`, assigning it the next free id.
    ///
    /// Fails if another live squad already carries the same callsign.
    pub fn insert(&mut self, mut squad: Squad) -> SquadResult<SquadId> {
        if self.callsigns.contains(&squad.callsign) {
            return Err(SquadError::DuplicateCallsign(squad.callsign));
        }
        let id = SquadId(self.next_id);
        self.next_id += 1;
        squad.id = id;
        self.callsigns.insert(squad.callsign.clone());
        trace!(%id, callsign = %squad.callsign, "squad registered");
        self.squads.push(squad);
        Ok(id)
    }

    /// Remove and return the squad with `id`.
    pub fn remove(&mut self, id: SquadId) -> Option<Squad> {
        let idx = self.position(id)?;
        let squad = self.squads.remove(idx);
        self.callsigns.remove(&squad.callsign);
        Some(squad)
    }

    /// Drop every squad.  Id allocation continues where it left off.
    pub fn clear(&mut self) {
        self.squads.clear();
        self.callsigns.clear();
    }

    #[inline]
    fn position(&self, id: SquadId) -> Option<usize> {
        self.squads.binary_search_by_key(&id, |s| s.id).ok()
    }

    pub fn get(&self, id: SquadId) -> Option<&Squad> {
        self.position(id).map(|i| &self.squads[i])
    }

    pub fn get_mut(&mut self, id: SquadId) -> Option<&mut Squad> {
        self.position(id).map(move |i| &mut self.squads[i])
    }

    pub fn contains(&self, id: SquadId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.squads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }

    /// Squads in ascending id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Squad> {
        self.squads.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Squad> {
        self.squads.iter_mut()
    }

    /// Contiguous view in ascending id order.
    pub fn as_slice(&self) -> &[Squad] {
        &self.squads
    }

    pub fn has_callsign(&self, callsign: &str) -> bool {
        self.callsigns.contains(callsign)
    }

    /// Number of live garrison squads anchored to `anchor`.
    pub fn garrison_count_at(&self, anchor: NodeId) -> usize {
        self.squads
            .iter()
            .filter(|s| s.is_garrison && s.anchor == Some(anchor))
            .count()
    }

    /// The squad nearest to `pos` and its distance.  Ties keep the lowest id.
    pub fn nearest_to(&self, pos: Vec2) -> Option<(SquadId, f32)> {
        let mut best: Option<(SquadId, f32)> = None;
        for s in &self.squads {
            let d = s.pos.distance(pos);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((s.id, d));
            }
        }
        best
    }
}

impl<'a> IntoIterator for &'a SquadRegistry {
    type Item = &'a Squad;
    type IntoIter = std::slice::Iter<'a, Squad>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
