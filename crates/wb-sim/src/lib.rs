//! `wb-sim`: tick loop and state machine for the warband squad-control core.
//!
//! # Tick loop
//!
//! ```text
//! host update(elapsed):
//!   TickScheduler turns elapsed time into N due ticks; for each tick:
//!   ① Regions : refresh each mobile squad's region from the road graph.
//!   ② Chasers : admit the max_chasers nearest detecting mobile squads.
//!   ③ Cap     : redirect mobile squads out of over-full regions.
//!   ④ Squads  : in ascending SquadId order, run the state machine:
//!                  garrison → engage/fire or idle in place
//!                  mobile   → engage, retreat, pursue, or patrol
//!                Shots are charged to one per-tick ShotBudget.
//!   ⑤ Separate: push apart mobile squads closer than separation_radius.
//!   ⑥ Notify  : throttled SquadMoved for squads that moved.
//! ```
//!
//! External events (`player_fired`, `kill_squad`, `remove_node`,
//! `regenerate_world`) run synchronously between ticks.  Every outbound
//! [`Notification`] goes through the [`EventBus`].
//!
//! # Modules
//!
//! | Module            | Contents                                          |
//! |-------------------|---------------------------------------------------|
//! | [`builder`]       | `SimBuilder`                                      |
//! | [`bus`]           | `EventBus`, `Subscription`                        |
//! | [`notification`]  | `Notification` and its payload types              |
//! | [`observer`]      | `SimObserver`, `NoopObserver`, `TickReport`       |
//! | [`sim`]           | `Sim`                                             |
//! | [`error`]         | `SimError`, `SimResult`                           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wb_core::AiConfig;
//! use wb_sim::{NoopObserver, SimBuilder};
//! use wb_world::DijkstraRouter;
//!
//! let mut sim = SimBuilder::new(AiConfig::default(), DijkstraRouter)
//!     .world(world_data)
//!     .build()?;
//! let _radio = sim.subscribe(|n| println!("{n:?}"));
//! sim.populate()?;
//! loop {
//!     sim.set_player_position(player_pos());
//!     sim.advance(frame_secs(), &mut NoopObserver);
//! }
//! ```

pub mod builder;
pub mod bus;
pub mod error;
mod machine;
pub mod notification;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use bus::{EventBus, Subscription};
pub use error::{SimError, SimResult};
pub use notification::{DestinationKind, Landmark, Notification, SupplyKind};
pub use observer::{NoopObserver, SimObserver, TickReport};
pub use sim::Sim;
