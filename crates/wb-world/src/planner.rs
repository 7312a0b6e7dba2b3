//! Waypoint construction over the road graph.
//!
//! A squad's path is built in up to three pieces:
//!
//! 1. a straight leg from the squad's position to the nearest road node,
//! 2. the shortest road polyline from that node to the road node serving the
//!    target (the target itself for cities and the capital),
//! 3. for camps, a straight off-road leg from the last road point to the camp.
//!
//! Planning never fails: an unreachable or invalid target produces an empty
//! waypoint list and the squad retries on its next idle evaluation.

use tracing::debug;

use wb_core::{NodeId, Vec2};

use crate::graph::WorldGraph;
use crate::router::{append_dedup, Router};

/// Shortest road polyline between two road nodes.
///
/// Empty when `from == to`, when either node is unknown or removed, or when
/// no route exists.
pub fn shortest_path(router: &dyn Router, graph: &WorldGraph, from: NodeId, to: NodeId) -> Vec<Vec2> {
    match router.route(graph, from, to) {
        Ok(route) => route.polyline,
        Err(e) => {
            debug!(%from, %to, error = %e, "shortest path unavailable");
            Vec::new()
        }
    }
}

/// Build the full waypoint sequence from `from_pos` to `target`.
///
/// Returns an empty sequence if `target` is unknown or removed, or the world
/// has no live road nodes.
pub fn plan_waypoints(
    router: &dyn Router,
    graph: &WorldGraph,
    from_pos: Vec2,
    target: NodeId,
) -> Vec<Vec2> {
    let (Some(target_pos), Some(target_kind)) = (graph.position(target), graph.kind(target)) else {
        debug!(%target, "plan target missing or removed");
        return Vec::new();
    };
    let Some(start) = graph.nearest_road_node(from_pos) else {
        debug!(%target, "no road nodes to plan over");
        return Vec::new();
    };
    let end = if target_kind.is_road_node() {
        target
    } else {
        match graph.nearest_road_node(target_pos) {
            Some(n) => n,
            None => return Vec::new(),
        }
    };

    let mut path = Vec::new();
    if let Some(start_pos) = graph.position(start) {
        path.push(from_pos);
        path.push(start_pos);
    }

    if start != end {
        let road = shortest_path(router, graph, start, end);
        if road.is_empty() {
            // Disconnected road network.
            return Vec::new();
        }
        append_dedup(&mut path, &road);
    }

    if !target_kind.is_road_node() {
        if path.is_empty() {
            path.push(from_pos);
        }
        path.push(target_pos);
    }
    path
}
