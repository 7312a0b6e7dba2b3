//! `wb-combat`: squad fire control and the player's health pool.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`resolver`] | `CombatResolver` (fire timers, hit roll, damage), `ShotOutcome` |
//! | [`budget`]   | `ShotBudget`: global per-tick shot cap                    |
//! | [`health`]   | `PlayerHealth`, `DamageReport`                             |

pub mod budget;
pub mod health;
pub mod resolver;


pub use budget::ShotBudget;
pub use health::{DamageReport, PlayerHealth};
pub use resolver::{CombatResolver, ShotOutcome};
