//! Synthetic five-node frontier with two camps, embedded as CSV.
//!
//! ```text
//!                 Kettle Hollow (camp)
//!                        ·
//!   Saltby ───────── Varn (capital) ───────── Ostra
//!     │                  │                      │
//!     └───────────────  Mirek ──────────────────┘      Reed Camp ·
//!
//!   Player base sits south of Mirek, off the road network.
//! ```

use std::io::Cursor;

use anyhow::Result;

use wb_world::{load_world_readers, WorldData};

const NODES_CSV: &str = "\
name,x,y,kind,region,garrison,ammo,meds,fuel
Varn,0,0,capital,0,4,40,10,20
Ostra,2400,200,city,1,2,12,4,6
Saltby,-2200,-100,city,2,2,8,3,4
Mirek,100,-1800,city,3,3,10,2,5
Kettle Hollow,300,1400,camp,0,2,,,
Reed Camp,3400,-900,camp,1,1,,,
Home,200,-3000,base,3,,,,
";

const ROADS_CSV: &str = "\
a,b,points
0,1,0:0;1200:300;2400:200
0,2,
0,3,
3,1,100:-1800;1500:-1200;2400:200
3,2,100:-1800;-1300:-1200;-2200:-100
";

pub fn build_world() -> Result<WorldData> {
    Ok(load_world_readers(Cursor::new(NODES_CSV), Cursor::new(ROADS_CSV))?)
}
