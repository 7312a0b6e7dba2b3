//! `wb-world`: world graph, spatial indexing, and route planning.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`node`]    | `NodeKind`, `NodeSpec`, `RoadSpec`, `WorldData`, `Supplies` |
//! | [`graph`]   | `WorldGraph` (CSR + polylines + R-tree), `WorldGraphBuilder`|
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`                   |
//! | [`planner`] | waypoint construction incl. off-road legs                   |
//! | [`loader`]  | CSV loading of node and road tables into `WorldData`        |
//! | [`error`]   | `WorldError`, `WorldResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod graph;
pub mod loader;
pub mod node;
pub mod planner;
pub mod router;


pub use error::{WorldError, WorldResult};
pub use graph::{WorldGraph, WorldGraphBuilder};
pub use loader::{load_world_csv, load_world_readers};
pub use node::{NodeKind, NodeSpec, RoadSpec, Supplies, WorldData};
pub use planner::{plan_waypoints, shortest_path};
pub use router::{DijkstraRouter, Route, Router};
