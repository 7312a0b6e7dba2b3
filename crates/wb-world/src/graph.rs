//! World graph representation and builder.
//!
//! # Data layout
//!
//! Node attributes are Structure-of-Arrays indexed by `NodeId`.  Roads are
//! stored as directed edges in **Compressed Sparse Row (CSR)** format: the
//! outgoing edges of node `n` are the edge indices
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! Every undirected road becomes two directed edges.  Each edge owns a slice
//! of the flat `points` array (`edge_points_start[e] .. edge_points_start[e+1]`)
//! holding its polyline in travel order, so the reverse edge stores the
//! polyline reversed.  Edge weight is the polyline's arc length.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over road nodes answers "nearest road node to
//! this point": used for off-road legs, region lookup, and investigation
//! targets.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;
use tracing::warn;

use wb_core::{NodeId, RegionId, Vec2};

use crate::{NodeKind, NodeSpec, Supplies, WorldData, WorldError, WorldResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[x, y]` point with the
/// associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── WorldGraph ────────────────────────────────────────────────────────────────

/// Weighted undirected road graph plus node attributes.
///
/// Build with [`WorldGraph::from_data`] or [`WorldGraphBuilder`].  Node
/// attributes are read-only except for supplies (resupply) and liveness
/// (node removal).
pub struct WorldGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    pub node_pos:      Vec<Vec2>,
    pub node_kind:     Vec<NodeKind>,
    pub node_region:   Vec<RegionId>,
    pub node_name:     Vec<String>,
    pub node_garrison: Vec<u32>,
    pub node_supplies: Vec<Supplies>,
    /// `false` once a node has been removed (camp destroyed, city captured).
    node_alive: Vec<bool>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,
    pub edge_from:      Vec<NodeId>,
    pub edge_to:        Vec<NodeId>,
    /// Polyline arc length of each edge.
    pub edge_weight:    Vec<f32>,
    /// Length = `edge_count + 1`.
    edge_points_start: Vec<u32>,
    points:            Vec<Vec2>,

    // ── Spatial index ─────────────────────────────────────────────────────
    road_idx: RTree<NodeEntry>,
}

impl WorldGraph {
    /// Construct an empty graph with no nodes or edges.
    pub fn empty() -> Self {
        WorldGraphBuilder::new().build()
    }

    /// Build a graph from world-generation output.
    ///
    /// Fails if a road references a node index outside `data.nodes` or has a
    /// polyline with fewer than two points.
    pub fn from_data(data: &WorldData) -> WorldResult<Self> {
        let mut b = WorldGraphBuilder::with_capacity(data.nodes.len(), data.roads.len() * 2);
        for spec in &data.nodes {
            b.add_node(spec.clone());
        }
        for (index, road) in data.roads.iter().enumerate() {
            b.add_road(road.a, road.b, road.polyline.clone())
                .map_err(|reason| WorldError::BadRoad { index, reason })?;
        }
        Ok(b.build())
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Node queries ──────────────────────────────────────────────────────

    /// `true` if `node` exists and has not been removed.
    #[inline]
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.node_alive.get(node.index()).copied().unwrap_or(false)
    }

    /// Position of a live node.
    #[inline]
    pub fn position(&self, node: NodeId) -> Option<Vec2> {
        self.is_alive(node).then(|| self.node_pos[node.index()])
    }

    #[inline]
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.is_alive(node).then(|| self.node_kind[node.index()])
    }

    #[inline]
    pub fn name(&self, node: NodeId) -> &str {
        self.node_name.get(node.index()).map(String::as_str).unwrap_or("")
    }

    /// Mutable supplies of a live node.
    pub fn supplies_mut(&mut self, node: NodeId) -> Option<&mut Supplies> {
        if !self.is_alive(node) {
            return None;
        }
        self.node_supplies.get_mut(node.index())
    }

    /// All live node ids in ascending order.
    pub fn live_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count() as u32)
            .map(NodeId)
            .filter(|&n| self.node_alive[n.index()])
    }

    /// Live nodes of the city pool (cities and the capital).
    pub fn city_pool(&self) -> Vec<NodeId> {
        self.live_nodes()
            .filter(|&n| self.node_kind[n.index()].is_road_node())
            .collect()
    }

    /// Live camp nodes.
    pub fn camp_pool(&self) -> Vec<NodeId> {
        self.live_nodes()
            .filter(|&n| self.node_kind[n.index()] == NodeKind::Camp)
            .collect()
    }

    /// Live destination nodes (cities, capital, camps) outside `region`.
    pub fn destinations_outside(&self, region: RegionId) -> Vec<NodeId> {
        self.live_nodes()
            .filter(|&n| {
                self.node_kind[n.index()].is_destination() && self.node_region[n.index()] != region
            })
            .collect()
    }

    /// Mark `node` as removed.  Returns `false` if it was unknown or already
    /// removed.
    ///
    /// Edges into a removed node are skipped by routing; the node disappears
    /// from every pool and nearest-node query.
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        match self.node_alive.get_mut(node.index()) {
            Some(alive) if *alive => {
                *alive = false;
                true
            }
            _ => false,
        }
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the edge indices of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = usize> + use<> {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        start..end
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Polyline of directed edge `edge`, in travel order.
    #[inline]
    pub fn edge_polyline(&self, edge: usize) -> &[Vec2] {
        let start = self.edge_points_start[edge] as usize;
        let end   = self.edge_points_start[edge + 1] as usize;
        &self.points[start..end]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The live road node (city or capital) nearest to `pos`.
    ///
    /// Returns `None` only if there are no live road nodes.
    pub fn nearest_road_node(&self, pos: Vec2) -> Option<NodeId> {
        self.road_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .map(|e| e.id)
            .find(|&id| self.is_alive(id))
    }

    /// Region of the road node nearest to `pos`, or `RegionId::INVALID` for
    /// a world without road nodes.
    pub fn region_at(&self, pos: Vec2) -> RegionId {
        self.nearest_road_node(pos)
            .map(|n| self.node_region[n.index()])
            .unwrap_or(RegionId::INVALID)
    }

    /// The live destination node (city, capital or camp) farthest from `pos`.
    ///
    /// Ties keep the lowest id.
    pub fn farthest_node_from(&self, pos: Vec2) -> Option<NodeId> {
        let mut best: Option<(NodeId, f32)> = None;
        for n in self.live_nodes() {
            if !self.node_kind[n.index()].is_destination() {
                continue;
            }
            let d = self.node_pos[n.index()].distance_sq(pos);
            if best.is_none_or(|(_, bd)| d > bd) {
                best = Some((n, d));
            }
        }
        best.map(|(n, _)| n)
    }

    /// The live city or capital nearest to `pos`, excluding `except`.
    ///
    /// Used to describe a camp relative to a known landmark.
    pub fn nearest_city_except(&self, pos: Vec2, except: NodeId) -> Option<NodeId> {
        self.road_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .map(|e| e.id)
            .find(|&id| id != except && self.is_alive(id))
    }
}

// ── WorldGraphBuilder ─────────────────────────────────────────────────────────

/// Construct a [`WorldGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use wb_core::{RegionId, Vec2};
/// use wb_world::{NodeKind, NodeSpec, WorldGraphBuilder};
///
/// let mut b = WorldGraphBuilder::new();
/// let a = b.add_node(NodeSpec::new("Ash", Vec2::new(0.0, 0.0), NodeKind::City, RegionId(0)));
/// let c = b.add_node(NodeSpec::new("Cole", Vec2::new(300.0, 400.0), NodeKind::City, RegionId(0)));
/// b.add_road(a, c, vec![Vec2::new(0.0, 0.0), Vec2::new(300.0, 400.0)]).unwrap();
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 2); // bidirectional
/// assert_eq!(g.edge_weight[0], 500.0);
/// ```
pub struct WorldGraphBuilder {
    nodes:     Vec<NodeSpec>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    weight:   f32,
    polyline: Vec<Vec2>,
}

impl WorldGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, spec: NodeSpec) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(spec);
        id
    }

    /// Add an undirected road between `a` and `b` along `polyline`
    /// (ordered from `a` to `b`).
    ///
    /// Inserts two directed edges; the `b → a` edge carries the reversed
    /// polyline.  Both weigh the polyline's arc length.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, polyline: Vec<Vec2>) -> Result<(), String> {
        let n = self.nodes.len();
        if a.index() >= n || b.index() >= n {
            return Err(format!("endpoint out of range ({a}, {b}) with {n} nodes"));
        }
        if a == b {
            return Err(format!("road loops on {a}"));
        }
        if polyline.len() < 2 {
            return Err(format!("polyline has {} point(s), need at least 2", polyline.len()));
        }
        let weight = arc_length(&polyline);
        let mut reversed = polyline.clone();
        reversed.reverse();
        self.raw_edges.push(RawEdge { from: a, to: b, weight, polyline });
        self.raw_edges.push(RawEdge { from: b, to: a, weight, polyline: reversed });
        Ok(())
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`WorldGraph`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> WorldGraph {
        let node_count = self.nodes.len();

        // Stable sort keeps insertion order among one node's edges.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }

        let mut edge_from   = Vec::with_capacity(raw.len());
        let mut edge_to     = Vec::with_capacity(raw.len());
        let mut edge_weight = Vec::with_capacity(raw.len());
        let mut edge_points_start = Vec::with_capacity(raw.len() + 1);
        let mut points = Vec::new();
        edge_points_start.push(0u32);
        for e in raw {
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_weight.push(e.weight);
            points.extend(e.polyline);
            edge_points_start.push(points.len() as u32);
        }

        // Duplicate names are legal but confuse every text message.
        let mut seen: FxHashMap<&str, NodeId> = FxHashMap::default();
        for (i, spec) in self.nodes.iter().enumerate() {
            if let Some(prev) = seen.insert(spec.name.as_str(), NodeId(i as u32)) {
                warn!(name = %spec.name, first = %prev, second = i, "duplicate node name");
            }
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, spec)| spec.kind.is_road_node())
            .map(|(i, spec)| NodeEntry { point: [spec.pos.x, spec.pos.y], id: NodeId(i as u32) })
            .collect();
        let road_idx = RTree::bulk_load(entries);

        let mut node_pos      = Vec::with_capacity(node_count);
        let mut node_kind     = Vec::with_capacity(node_count);
        let mut node_region   = Vec::with_capacity(node_count);
        let mut node_name     = Vec::with_capacity(node_count);
        let mut node_garrison = Vec::with_capacity(node_count);
        let mut node_supplies = Vec::with_capacity(node_count);
        for spec in self.nodes {
            node_pos.push(spec.pos);
            node_kind.push(spec.kind);
            node_region.push(spec.region);
            node_name.push(spec.name);
            node_garrison.push(spec.garrison);
            node_supplies.push(spec.supplies);
        }

        WorldGraph {
            node_pos,
            node_kind,
            node_region,
            node_name,
            node_garrison,
            node_supplies,
            node_alive: vec![true; node_count],
            node_out_start,
            edge_from,
            edge_to,
            edge_weight,
            edge_points_start,
            points,
            road_idx,
        }
    }
}

impl Default for WorldGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum of segment lengths along a polyline.
pub fn arc_length(polyline: &[Vec2]) -> f32 {
    polyline.windows(2).map(|w| w[0].distance(w[1])).sum()
}
