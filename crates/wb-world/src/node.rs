//! World input records, as handed over by world generation.

use wb_core::{NodeId, RegionId, Vec2};

/// What a world node is.  Only cities and the capital sit on the road
/// network; camps are reached by an off-road leg from the nearest road node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    City,
    Camp,
    Capital,
    /// The player's base.  Never a patrol target or a retreat destination.
    Base,
}

impl NodeKind {
    /// `true` for kinds that are vertices of the road graph.
    #[inline]
    pub fn is_road_node(self) -> bool {
        matches!(self, NodeKind::City | NodeKind::Capital)
    }

    /// `true` for kinds patrols may travel to (city pool or camp pool).
    #[inline]
    pub fn is_destination(self) -> bool {
        !matches!(self, NodeKind::Base)
    }
}

/// Resource counters stored at a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Supplies {
    pub ammo: i32,
    pub meds: i32,
    pub fuel: i32,
}

/// One node as supplied by world generation.
///
/// The node's `NodeId` is its index in [`WorldData::nodes`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSpec {
    pub name:     String,
    pub pos:      Vec2,
    pub kind:     NodeKind,
    pub region:   RegionId,
    /// Number of garrison squads anchored here at generation time.
    pub garrison: u32,
    pub supplies: Supplies,
}

impl NodeSpec {
    /// Convenience constructor with no garrison and empty supplies.
    pub fn new(name: impl Into<String>, pos: Vec2, kind: NodeKind, region: RegionId) -> Self {
        Self {
            name: name.into(),
            pos,
            kind,
            region,
            garrison: 0,
            supplies: Supplies::default(),
        }
    }

    pub fn with_garrison(mut self, garrison: u32) -> Self {
        self.garrison = garrison;
        self
    }
}

/// An undirected road between two nodes.
///
/// `polyline` runs from `a` to `b` and must contain at least two points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadSpec {
    pub a:        NodeId,
    pub b:        NodeId,
    pub polyline: Vec<Vec2>,
}

impl RoadSpec {
    /// A straight road between two points.
    pub fn straight(a: NodeId, b: NodeId, from: Vec2, to: Vec2) -> Self {
        Self { a, b, polyline: vec![from, to] }
    }
}

/// Everything the control core needs from a freshly generated world.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldData {
    pub nodes: Vec<NodeSpec>,
    pub roads: Vec<RoadSpec>,
}
