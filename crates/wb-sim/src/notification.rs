//! Outbound notifications published on the [`EventBus`][crate::EventBus].
//!
//! Every variant carries plain data so subscribers can forward it to a UI,
//! a radio-chatter generator, or a log without touching simulation state.

use std::fmt;

use wb_core::{Compass, NodeId, RegionId, SquadId, Vec2};
use wb_world::NodeKind;

/// Whether a patrol or resupply destination is a city or a camp.
///
/// Capitals report as cities.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DestinationKind {
    City,
    Camp,
}

impl DestinationKind {
    pub fn of(kind: NodeKind) -> DestinationKind {
        match kind {
            NodeKind::Camp => DestinationKind::Camp,
            _ => DestinationKind::City,
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DestinationKind::City => "city",
            DestinationKind::Camp => "camp",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupplyKind {
    Ammo,
    Meds,
}

impl fmt::Display for SupplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SupplyKind::Ammo => "ammo",
            SupplyKind::Meds => "meds",
        })
    }
}

/// A city used to describe where a camp lies: "the camp north of Ostra".
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Landmark {
    pub node: NodeId,
    pub name: String,
    /// Bearing from the landmark to the described location.
    pub bearing: Compass,
}

/// Everything the control core tells the outside world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    SquadSpawned {
        squad:       SquadId,
        callsign:    String,
        pos:         Vec2,
        region:      RegionId,
        is_garrison: bool,
    },
    /// Throttled position update for a mobile squad.
    SquadMoved {
        squad: SquadId,
        pos:   Vec2,
    },
    SquadDied {
        squad:       SquadId,
        callsign:    String,
        is_garrison: bool,
        anchor:      Option<NodeId>,
        pos:         Vec2,
    },
    /// A garrison lost a member; `remaining` squads still hold `anchor`.
    GarrisonCountChanged {
        anchor:    NodeId,
        remaining: usize,
    },
    /// A squad chose a new patrol destination.
    PlannedMove {
        squad:       SquadId,
        callsign:    String,
        destination: NodeId,
        name:        String,
        kind:        DestinationKind,
        pos:         Vec2,
        bearing:     Compass,
    },
    /// A cowardly squad broke off an engagement and is falling back.
    RetreatDeclared {
        squad:       SquadId,
        callsign:    String,
        destination: NodeId,
        name:        String,
        bearing:     Compass,
    },
    /// A squad entered combat this tick.
    Engaged {
        squad:    SquadId,
        callsign: String,
    },
    /// A squad heard the player's gunfire and is moving to investigate.
    HeardShots {
        squad:    SquadId,
        callsign: String,
        /// Bearing from the squad to the gunfire.
        bearing:  Compass,
    },
    Resupplied {
        squad:    SquadId,
        callsign: String,
        node:     NodeId,
        name:     String,
        kind:     DestinationKind,
        supply:   SupplyKind,
        amount:   i32,
        pos:      Vec2,
        /// Nearest other city, set for camps only.
        landmark: Option<Landmark>,
    },
    /// A squad answered a help request.
    HelpAccepted {
        squad:           SquadId,
        callsign:        String,
        caller_callsign: String,
    },
    ReinforcementRequested {
        caller:   SquadId,
        callsign: String,
        pos:      Vec2,
        radius:   f32,
    },
    PlayerDamaged {
        by:     SquadId,
        amount: i32,
        hp_now: i32,
    },
    PlayerDied {
        by: SquadId,
    },
    WorldRebuilt {
        nodes: usize,
        roads: usize,
    },
}

impl Notification {
    /// The squad this notification is about, if any.
    pub fn squad(&self) -> Option<SquadId> {
        match self {
            Notification::SquadSpawned { squad, .. }
            | Notification::SquadMoved { squad, .. }
            | Notification::SquadDied { squad, .. }
            | Notification::PlannedMove { squad, .. }
            | Notification::RetreatDeclared { squad, .. }
            | Notification::Engaged { squad, .. }
            | Notification::HeardShots { squad, .. }
            | Notification::Resupplied { squad, .. }
            | Notification::HelpAccepted { squad, .. } => Some(*squad),
            Notification::ReinforcementRequested { caller, .. } => Some(*caller),
            Notification::PlayerDamaged { by, .. } | Notification::PlayerDied { by } => Some(*by),
            Notification::GarrisonCountChanged { .. } | Notification::WorldRebuilt { .. } => None,
        }
    }
}
