//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `wb-sim` plans every route through the [`Router`] trait, so hosts can swap
//! in A* or a cached all-pairs table without touching the state machine.
//!
//! # Cost units
//!
//! Edge cost is polyline arc length in map units.  Ties between equal-cost
//! frontier entries are broken by ascending `NodeId`, so equal-length
//! alternatives always resolve the same way.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use wb_core::{NodeId, Vec2};

use crate::graph::WorldGraph;
use crate::{WorldError, WorldResult};

/// Points closer than this (squared) are treated as the same waypoint when
/// joining polylines.
pub(crate) const JOIN_EPS_SQ: f32 = 0.01;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, Default)]
pub struct Route {
    /// Nodes visited in order, `from` first and `to` last.  Empty when
    /// `from == to`.
    pub nodes: Vec<NodeId>,
    /// Concatenated edge polylines with duplicated joints removed.
    pub polyline: Vec<Vec2>,
    /// Sum of edge weights.
    pub total_weight: f32,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Router: Send + Sync {
    /// Compute a shortest route from `from` to `to`.
    ///
    /// `from == to` yields an empty route rather than an error.  Removed
    /// nodes are never traversed.
    fn route(&self, graph: &WorldGraph, from: NodeId, to: NodeId) -> WorldResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over the CSR road graph.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &WorldGraph, from: NodeId, to: NodeId) -> WorldResult<Route> {
        dijkstra(graph, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Min-heap entry ordered by `(cost, node)`.
#[derive(Copy, Clone, PartialEq)]
struct HeapEntry {
    cost: f32,
    node: NodeId,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(graph: &WorldGraph, from: NodeId, to: NodeId) -> WorldResult<Route> {
    for n in [from, to] {
        if n.index() >= graph.node_count() {
            return Err(WorldError::NodeNotFound(n));
        }
        if !graph.is_alive(n) {
            return Err(WorldError::NodeRemoved(n));
        }
    }
    if from == to {
        return Ok(Route::default());
    }

    let n = graph.node_count();
    let mut dist = vec![f32::INFINITY; n];
    // prev_edge[v] = edge index that reached v; usize::MAX for unreached nodes.
    let mut prev_edge = vec![usize::MAX; n];

    dist[from.index()] = 0.0;

    let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    heap.push(Reverse(HeapEntry { cost: 0.0, node: from }));

    while let Some(Reverse(HeapEntry { cost, node })) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge];
            if !graph.is_alive(neighbor) {
                continue;
            }
            let new_cost = cost + graph.edge_weight[edge];
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse(HeapEntry { cost: new_cost, node: neighbor }));
            }
        }
    }

    Err(WorldError::NoRoute { from, to })
}

fn reconstruct(
    graph: &WorldGraph,
    prev_edge: &[usize],
    from: NodeId,
    to: NodeId,
    total_weight: f32,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        if e == usize::MAX {
            break;
        }
        edges.push(e);
        cur = graph.edge_from[e];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    let mut polyline: Vec<Vec2> = Vec::new();
    for &e in &edges {
        nodes.push(graph.edge_to[e]);
        append_dedup(&mut polyline, graph.edge_polyline(e));
    }
    Route { nodes, polyline, total_weight }
}

/// Append `points` to `out`, dropping any point that coincides with the
/// previous one.
pub(crate) fn append_dedup(out: &mut Vec<Vec2>, points: &[Vec2]) {
    for &p in points {
        match out.last() {
            Some(&last) if last.distance_sq(p) <= JOIN_EPS_SQ => {}
            _ => out.push(p),
        }
    }
}
