//! `wb-behavior`: the tick-global decisions of the squad control core.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`context`]       | `TickContext<'a>`: read-only per-tick inputs             |
//! | [`chasers`]       | `ChaserSet`: the `max_chasers` nearest detecting squads  |
//! | [`separation`]    | pairwise repulsion among mobile squads                    |
//! | [`region_cap`]    | `Redirect` decisions for over-full regions                |
//! | [`reinforcement`] | help-request caller, help acceptance, gunfire hearing     |
//!
//! # Design notes
//!
//! Every function here only *decides*: it reads squads through shared
//! references and returns ids, deltas, or redirects.  `wb-sim` applies the
//! decisions and publishes the matching notifications.  Decisions computed
//! at the start of a tick (chaser set, redirects) are frozen for that tick,
//! so squads processed later in the tick never see earlier squads' updates
//! for capped resources.

pub mod chasers;
pub mod context;
pub mod region_cap;
pub mod reinforcement;
pub mod separation;

#[cfg(test)]
mod tests;

pub use chasers::ChaserSet;
pub use context::TickContext;
pub use region_cap::{plan_redirects, Redirect};
pub use reinforcement::{help_responders, hearing_responders, nominate_caller};
pub use separation::separation_deltas;
