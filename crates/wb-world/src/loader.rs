//! CSV world loader.
//!
//! # CSV format
//!
//! Two tables.  Nodes, one row per node; the row index is the `NodeId`:
//!
//! ```csv
//! name,x,y,kind,region,garrison,ammo,meds,fuel
//! Varn,0,0,capital,0,3,40,10,20
//! Ostra,1200,300,city,1,2,12,4,6
//! Kettle Hollow,1500,900,camp,1,2,0,0,0
//! ```
//!
//! **`kind`** is one of `city`, `camp`, `capital`, `base` (case-insensitive).
//! `garrison` and the supply columns may be left empty for zero.
//!
//! Roads, one row per undirected road:
//!
//! ```csv
//! a,b,points
//! 0,1,0:0;600:100;1200:300
//! 1,2,
//! ```
//!
//! **`points`** is the polyline from `a` to `b` as `x:y` pairs separated by
//! `;`.  An empty field means a straight road between the two node
//! positions.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use wb_core::{NodeId, RegionId, Vec2};

use crate::{NodeKind, NodeSpec, RoadSpec, Supplies, WorldData, WorldError, WorldResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    name:     String,
    x:        f32,
    y:        f32,
    kind:     String,
    region:   u32,
    garrison: Option<u32>,
    ammo:     Option<i32>,
    meds:     Option<i32>,
    fuel:     Option<i32>,
}

#[derive(Deserialize)]
struct RoadRecord {
    a:      u32,
    b:      u32,
    points: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a world from a node CSV file and a road CSV file.
pub fn load_world_csv(nodes: &Path, roads: &Path) -> WorldResult<WorldData> {
    let nodes = std::fs::File::open(nodes)?;
    let roads = std::fs::File::open(roads)?;
    load_world_readers(nodes, roads)
}

/// Like [`load_world_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor` or a byte slice).
pub fn load_world_readers<N: Read, R: Read>(nodes: N, roads: R) -> WorldResult<WorldData> {
    let mut data = WorldData::default();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| WorldError::Parse(e.to_string()))?;
        data.nodes.push(NodeSpec {
            name:     row.name,
            pos:      Vec2::new(row.x, row.y),
            kind:     parse_kind(&row.kind)?,
            region:   RegionId(row.region),
            garrison: row.garrison.unwrap_or(0),
            supplies: Supplies {
                ammo: row.ammo.unwrap_or(0),
                meds: row.meds.unwrap_or(0),
                fuel: row.fuel.unwrap_or(0),
            },
        });
    }

    // ── Roads ─────────────────────────────────────────────────────────────
    let mut road_reader = csv::Reader::from_reader(roads);
    for (index, result) in road_reader.deserialize::<RoadRecord>().enumerate() {
        let row = result.map_err(|e| WorldError::Parse(e.to_string()))?;
        let (a, b) = (NodeId(row.a), NodeId(row.b));
        let polyline = match row.points.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => parse_points(s)?,
            _ => {
                let (Some(pa), Some(pb)) = (data.nodes.get(a.index()), data.nodes.get(b.index()))
                else {
                    return Err(WorldError::BadRoad {
                        index,
                        reason: format!("endpoint out of range ({a}, {b})"),
                    });
                };
                vec![pa.pos, pb.pos]
            }
        };
        data.roads.push(RoadSpec { a, b, polyline });
    }

    Ok(data)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_kind(s: &str) -> WorldResult<NodeKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "city"    => Ok(NodeKind::City),
        "camp"    => Ok(NodeKind::Camp),
        "capital" => Ok(NodeKind::Capital),
        "base"    => Ok(NodeKind::Base),
        other => Err(WorldError::Parse(format!(
            "invalid node kind {other:?}: expected \"city\", \"camp\", \"capital\", or \"base\""
        ))),
    }
}

fn parse_points(s: &str) -> WorldResult<Vec<Vec2>> {
    s.split(';')
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            let (x, y) = p
                .split_once(':')
                .ok_or_else(|| WorldError::Parse(format!("invalid point {p:?}: expected \"x:y\"")))?;
            let x = x.trim().parse::<f32>().map_err(|e| WorldError::Parse(format!("{p:?}: {e}")))?;
            let y = y.trim().parse::<f32>().map_err(|e| WorldError::Parse(format!("{p:?}: {e}")))?;
            Ok(Vec2::new(x, y))
        })
        .collect()
}
