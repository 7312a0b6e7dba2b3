//! `wb-core`: foundational types for the warband squad-control core.
//!
//! This crate is a dependency of every other `wb-*` crate.  It has no `wb-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `SquadId`, `NodeId`, `RegionId`                       |
//! | [`geo`]         | `Vec2`, `Compass` (8-way bearing)                     |
//! | [`time`]        | `Tick`, `SimClock`, `TickScheduler`                   |
//! | [`rng`]         | `Dice` trait, `SimRng` (seeded), `FixedDice` (tests)  |
//! | [`config`]      | `AiConfig`: every control-core tunable               |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::AiConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{Compass, Vec2};
pub use ids::{NodeId, RegionId, SquadId};
pub use rng::{Dice, FixedDice, SimRng};
pub use time::{SimClock, Tick, TickScheduler, MAX_CATCH_UP_TICKS};
