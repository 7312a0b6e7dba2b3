//! skirmish: scripted player run against the warband squad-control core.
//!
//! Loads a synthetic frontier, populates it with garrisons and roaming
//! squads, then walks a scripted player from the southern base through the
//! capital and out east while firing and occasionally killing the nearest
//! squad.  Every notification is logged through `tracing`.
//!
//! ```text
//! cargo run -p skirmish                       # defaults
//! cargo run -p skirmish -- tuning.json        # AiConfig + SpawnConfig overrides
//! RUST_LOG=wb_sim=debug cargo run -p skirmish # state-machine transitions
//! ```

mod world;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wb_core::{AiConfig, Vec2};
use wb_sim::{Notification, SimBuilder, SimObserver, TickReport};
use wb_squad::SpawnConfig;
use wb_world::DijkstraRouter;

use world::build_world;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:          u64 = 7;
const FRAME_SECS:    f64 = 1.0 / 30.0;
const RUN_SECS:      f64 = 180.0;
const PLAYER_SPEED:  f32 = 60.0;
/// Seconds between scripted volleys.
const FIRE_EVERY:    f64 = 3.0;
/// Seconds between scripted kills.
const KILL_EVERY:    f64 = 10.0;
const KILL_RANGE:    f32 = 400.0;

/// Player route: base → Mirek → Varn → Ostra.
const ROUTE: [Vec2; 4] = [
    Vec2 { x: 200.0, y: -3000.0 },
    Vec2 { x: 100.0, y: -1800.0 },
    Vec2 { x: 0.0, y: 0.0 },
    Vec2 { x: 2400.0, y: 200.0 },
];

// ── Tuning file ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
struct Tuning {
    ai:    AiConfig,
    spawn: SpawnConfig,
}

fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning { ai: AiConfig { seed: SEED, ..AiConfig::default() }, ..Tuning::default() });
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CombatTally {
    ticks:      u64,
    shots:      u64,
    hits:       u64,
    peak_chase: usize,
    redirected: usize,
}

impl SimObserver for CombatTally {
    fn on_tick_end(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.shots += u64::from(report.shots_fired);
        self.hits += u64::from(report.hits);
        self.peak_chase = self.peak_chase.max(report.engaged);
        self.redirected += report.redirected;
    }
}

// ── Scripted player ───────────────────────────────────────────────────────────

/// Position after walking `dist` units along [`ROUTE`].
fn route_position(mut dist: f32) -> Vec2 {
    for leg in ROUTE.windows(2) {
        let len = leg[0].distance(leg[1]);
        if dist <= len {
            return leg[0] + leg[0].direction_to(leg[1]) * dist;
        }
        dist -= len;
    }
    ROUTE[ROUTE.len() - 1]
}

fn describe(n: &Notification) -> Option<String> {
    Some(match n {
        Notification::PlannedMove { callsign, name, kind, bearing, .. } => {
            format!("{callsign}: moving to {kind} {name}, heading {bearing}")
        }
        Notification::RetreatDeclared { callsign, name, .. } => format!("{callsign}: falling back to {name}!"),
        Notification::Engaged { callsign, .. } => format!("{callsign}: contact!"),
        Notification::HeardShots { callsign, bearing, .. } => format!("{callsign}: shots to the {bearing}"),
        Notification::Resupplied { callsign, name, supply, amount, landmark, .. } => match landmark {
            Some(l) => format!("{callsign}: dropped {amount} {supply} at {name}, {} of {}", l.bearing, l.name),
            None => format!("{callsign}: dropped {amount} {supply} at {name}"),
        },
        Notification::ReinforcementRequested { callsign, .. } => format!("{callsign}: requesting support"),
        Notification::HelpAccepted { callsign, caller_callsign, .. } => {
            format!("{callsign}: moving to assist {caller_callsign}")
        }
        Notification::SquadDied { callsign, .. } => format!("{callsign} is down"),
        Notification::GarrisonCountChanged { remaining, .. } => format!("garrison strength now {remaining}"),
        Notification::PlayerDied { .. } => "player killed".to_string(),
        _ => return None,
    })
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let arg = std::env::args().nth(1);
    let tuning = load_tuning(arg.as_deref().map(Path::new))?;
    info!(seed = tuning.ai.seed, tick_hz = tuning.ai.tick_hz, "starting skirmish");

    // 1. World and simulation.
    let data = build_world()?;
    let mut sim = SimBuilder::new(tuning.ai, DijkstraRouter)
        .world(data)
        .spawn_config(tuning.spawn)
        .player_position(ROUTE[0])
        .build()?;

    // 2. Radio log.  Damage is tallied rather than logged.
    let damage_taken = Rc::new(RefCell::new(0i64));
    let damage = Rc::clone(&damage_taken);
    let _radio = sim.subscribe(move |n| {
        if let Notification::PlayerDamaged { amount, .. } = n {
            *damage.borrow_mut() += i64::from(*amount);
        } else if let Some(line) = describe(n) {
            match n.squad() {
                Some(squad) => info!(target: "radio", %squad, "{line}"),
                None => info!(target: "radio", "{line}"),
            }
        }
    });

    // 3. Populate.
    let ids = sim.populate()?;
    info!(squads = ids.len(), "world populated");

    // 4. Run.
    let mut tally = CombatTally::default();
    let (mut next_fire, mut next_kill) = (FIRE_EVERY, KILL_EVERY);
    let mut kills = 0usize;
    let t0 = Instant::now();
    let mut host_secs = 0.0f64;
    while host_secs < RUN_SECS {
        host_secs += FRAME_SECS;
        let player = route_position(PLAYER_SPEED * host_secs as f32);
        sim.set_player_position(player);

        if host_secs >= next_fire {
            next_fire += FIRE_EVERY;
            sim.player_fired(player);
        }
        if host_secs >= next_kill {
            next_kill += KILL_EVERY;
            if let Some((id, d)) = sim.registry.nearest_to(player) {
                if d <= KILL_RANGE && sim.kill_squad(id, None) {
                    kills += 1;
                }
            }
        }

        sim.advance(FRAME_SECS, &mut tally);
        if sim.health.is_dead() {
            warn!(at = %sim.clock, "player died, ending run");
            break;
        }
    }
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!();
    println!("Skirmish complete in {:.3} s wall, {} simulated", elapsed.as_secs_f64(), sim.clock);
    println!("  ticks        : {}", tally.ticks);
    println!("  shots / hits : {} / {}", tally.shots, tally.hits);
    println!("  damage taken : {}  (hp {}/{})", damage_taken.borrow(), sim.health.hp(), sim.health.max_hp());
    println!("  peak chasers : {}", tally.peak_chase);
    println!("  redirects    : {}", tally.redirected);
    println!("  kills        : {kills}");
    println!();

    println!("{:<14} {:<9} {:<11} {:<8}", "Squad", "State", "Persona", "Target");
    println!("{}", "-".repeat(46));
    for s in sim.registry.iter().filter(|s| !s.is_garrison) {
        let target = match (s.target, sim.graph()) {
            (Some(t), Some(g)) => g.name(t).to_string(),
            _ => "-".to_string(),
        };
        println!("{:<14} {:<9} {:<11} {:<8}", s.callsign, s.state, s.persona, target);
    }
    Ok(())
}
