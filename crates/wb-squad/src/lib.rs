//! `wb-squad`: squad entities and the authoritative squad registry.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`persona`]   | `Persona` and its per-persona probability tables          |
//! | [`squad`]     | `Squad` entity, `AiState`, path cursor (`PathStep`)       |
//! | [`registry`]  | `SquadRegistry`: id allocation, lookup, removal          |
//! | [`spawner`]   | `SpawnConfig`, `SquadSpawner` (garrison rings, mobiles)   |
//! | [`error`]     | `SquadError`, `SquadResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod persona;
pub mod registry;
pub mod spawner;
pub mod squad;

#[cfg(test)]
mod tests;

pub use error::{SquadError, SquadResult};
pub use persona::Persona;
pub use registry::SquadRegistry;
pub use spawner::{SpawnConfig, SquadSpawner};
pub use squad::{AiState, PathStep, Squad};
