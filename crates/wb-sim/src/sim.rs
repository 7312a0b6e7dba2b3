//! The [`Sim`] struct and its tick loop.

use tracing::{debug, info, trace};

use wb_behavior::{
    hearing_responders, help_responders, nominate_caller, plan_redirects, separation_deltas, ChaserSet,
    TickContext,
};
use wb_combat::{CombatResolver, PlayerHealth, ShotBudget};
use wb_core::{AiConfig, Compass, Dice, NodeId, SimClock, SimRng, SquadId, Tick, TickScheduler, Vec2};
use wb_squad::{AiState, SpawnConfig, Squad, SquadRegistry, SquadSpawner};
use wb_world::{DijkstraRouter, Router, WorldData, WorldGraph};

use crate::machine::{Delivery, Machine};
use crate::{EventBus, Notification, SimObserver, SimResult, Subscription, SupplyKind, TickReport};

/// The squad control core.
///
/// Create via [`SimBuilder`][crate::SimBuilder].  Drive it with
/// [`advance`](Self::advance) from the host's update loop, or
/// [`step`](Self::step) / [`run_ticks`](Self::run_ticks) for scripted runs.
///
/// Until a world is loaded every tick-driven and world-dependent operation
/// is a silent no-op.
pub struct Sim<R: Router = DijkstraRouter, D: Dice = SimRng> {
    pub spawn:    SpawnConfig,
    pub clock:    SimClock,
    pub registry: SquadRegistry,
    pub health:   PlayerHealth,
    pub router:   R,
    pub combat:   CombatResolver,
    pub(crate) config:    AiConfig,
    pub(crate) graph:     Option<WorldGraph>,
    pub(crate) dice:      D,
    pub(crate) scheduler: TickScheduler,
    pub(crate) bus:       EventBus,
    pub(crate) player:    Vec2,
}

impl<R: Router, D: Dice> Sim<R, D> {
    // ── Accessors ─────────────────────────────────────────────────────────

    /// Tunables fixed at build time; the combat rules and tick rate are
    /// derived from them once.
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn graph(&self) -> Option<&WorldGraph> {
        self.graph.as_ref()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Register a notification handler; it stays registered until the
    /// returned [`Subscription`] is dropped.
    pub fn subscribe(&self, handler: impl FnMut(&Notification) + 'static) -> Subscription {
        self.bus.subscribe(handler)
    }

    pub fn squad(&self, id: SquadId) -> Option<&Squad> {
        self.registry.get(id)
    }

    /// Current simulation time in seconds.
    pub fn now(&self) -> f64 {
        self.clock.now_secs()
    }

    pub fn player_position(&self) -> Vec2 {
        self.player
    }

    /// Polled by every subsequent tick.
    pub fn set_player_position(&mut self, pos: Vec2) {
        self.player = pos;
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Feed `elapsed_secs` of host time and run every tick that came due.
    ///
    /// Returns the number of ticks run.
    pub fn advance<O: SimObserver>(&mut self, elapsed_secs: f64, observer: &mut O) -> u32 {
        if self.graph.is_none() {
            return 0;
        }
        let due = self.scheduler.advance(elapsed_secs);
        for _ in 0..due {
            self.step(observer);
        }
        due
    }

    /// Run exactly `n` ticks.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Run one tick and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> TickReport {
        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);
        let report = self.process_tick(tick);
        observer.on_tick_end(&report);
        self.clock.advance();
        report
    }

    fn process_tick(&mut self, tick: Tick) -> TickReport {
        let mut report = TickReport { tick, ..TickReport::default() };
        let mut deliveries: Vec<Delivery> = Vec::new();

        {
            let Some((mut m, registry)) = self.split() else {
                return report;
            };

            for s in registry.iter_mut().filter(|s| !s.is_garrison) {
                s.region = m.graph.region_at(s.pos);
            }
            let start: Vec<Vec2> = registry.iter().map(|s| s.pos).collect();
            let ctx = TickContext::new(m.now, m.player, m.graph, m.config);

            // ① Chaser admission, before any squad moves.
            let chasers = ChaserSet::admit(registry.iter(), m.player, m.config.max_chasers);

            // ② Region cap.  Squads already bound for another region keep
            // their orders.
            for r in plan_redirects(registry.as_slice(), &ctx, &mut *m.dice) {
                let Some(s) = registry.get_mut(r.squad) else { continue };
                if s.target.is_some_and(|t| m.graph.is_alive(t) && m.graph.node_region[t.index()] != r.region) {
                    continue;
                }
                m.redirect(s, r.destination);
                report.redirected += 1;
            }

            // ③ Per-squad evaluation in ascending id order.
            let mut budget = ShotBudget::new(m.config.max_shots_per_tick);
            for s in registry.iter_mut() {
                if s.is_garrison {
                    m.step_garrison(s, &mut budget, &mut report);
                } else {
                    m.step_mobile(s, &chasers, &mut budget, &mut report, &mut deliveries);
                }
            }

            // ④ Separation from post-movement positions.
            for (id, delta) in separation_deltas(registry.as_slice(), &ctx, &mut *m.dice) {
                if let Some(s) = registry.get_mut(id) {
                    s.pos += delta;
                }
            }

            // ⑤ Throttled movement broadcasts.
            let min_sq = m.config.movement_broadcast_min_dist.powi(2);
            let interval = 1.0 / f64::from(m.config.movement_broadcast_hz.max(1e-3));
            for (s, old) in registry.iter_mut().zip(start) {
                if s.is_garrison || s.pos.distance_sq(old) < min_sq {
                    continue;
                }
                if s.last_moved_broadcast.is_some_and(|t| m.now - t < interval) {
                    continue;
                }
                s.last_moved_broadcast = Some(m.now);
                m.bus.publish(Notification::SquadMoved { squad: s.id, pos: s.pos });
            }
        }

        if let Some(graph) = self.graph.as_mut() {
            for d in deliveries {
                if let Some(stock) = graph.supplies_mut(d.node) {
                    match d.supply {
                        SupplyKind::Ammo => stock.ammo += d.amount,
                        SupplyKind::Meds => stock.meds += d.amount,
                    }
                }
            }
        }

        trace!(
            %tick,
            shots = report.shots_fired,
            hits = report.hits,
            engaged = report.engaged,
            redirected = report.redirected,
            "tick complete"
        );
        report
    }

    /// Borrow the state machine's inputs alongside the registry.
    ///
    /// `None` until a world is loaded.
    fn split(&mut self) -> Option<(Machine<'_, R, D>, &mut SquadRegistry)> {
        let Sim { config, clock, registry, health, router, combat, graph, dice, bus, player, .. } = self;
        let graph = graph.as_ref()?;
        let machine = Machine {
            graph,
            router,
            config,
            combat,
            dice,
            bus,
            health,
            now: clock.now_secs(),
            player: *player,
        };
        Some((machine, registry))
    }

    // ── External events ───────────────────────────────────────────────────

    /// The player fired at `pos`.  Nearby idle squads may investigate.
    ///
    /// Returns the squads that responded.
    pub fn player_fired(&mut self, pos: Vec2) -> Vec<SquadId> {
        let Some((mut m, registry)) = self.split() else {
            return Vec::new();
        };
        let heard = hearing_responders(registry.iter(), pos, m.config, &mut *m.dice);
        for &id in &heard {
            let Some(s) = registry.get_mut(id) else { continue };
            m.bus.publish(Notification::HeardShots {
                squad:    s.id,
                callsign: s.callsign.clone(),
                bearing:  Compass::between(s.pos, pos),
            });
            let secs = m.config.investigate_secs;
            m.investigate(s, pos, secs);
        }
        if !heard.is_empty() {
            debug!(count = heard.len(), "squads investigating gunfire");
        }
        heard
    }

    /// Remove a squad killed by the player.
    ///
    /// `pos` overrides the reported death position (defaults to the squad's
    /// own).  Returns `false` if no such squad exists.
    pub fn kill_squad(&mut self, id: SquadId, pos: Option<Vec2>) -> bool {
        let Some(squad) = self.registry.remove(id) else {
            return false;
        };
        let pos = pos.unwrap_or(squad.pos);
        info!(squad = %id, callsign = %squad.callsign, garrison = squad.is_garrison, "squad killed");
        self.bus.publish(Notification::SquadDied {
            squad:       id,
            callsign:    squad.callsign.clone(),
            is_garrison: squad.is_garrison,
            anchor:      squad.anchor,
            pos,
        });
        if squad.is_garrison {
            if let Some(anchor) = squad.anchor {
                let remaining = self.registry.garrison_count_at(anchor);
                self.bus.publish(Notification::GarrisonCountChanged { anchor, remaining });
            }
        }
        self.call_for_help(pos);
        true
    }

    /// The nearest survivor may call for help; willing mobile squads nearby
    /// converge on the death site.
    fn call_for_help(&mut self, pos: Vec2) {
        let Some((mut m, registry)) = self.split() else { return };
        let Some(caller) = nominate_caller(registry.iter(), pos, m.config.help_broadcast_radius) else {
            return;
        };
        if !m.dice.chance(m.config.help_request_prob) {
            debug!(%caller, "caller stayed silent");
            return;
        }
        let caller_callsign = registry.get(caller).map(|s| s.callsign.clone()).unwrap_or_default();
        let radius = m.config.help_response_radius;
        m.bus.publish(Notification::ReinforcementRequested {
            caller,
            callsign: caller_callsign.clone(),
            pos,
            radius,
        });

        let responders = help_responders(registry.iter(), pos, radius, &mut *m.dice);
        debug!(%caller, responders = responders.len(), "reinforcements requested");
        for id in responders {
            let Some(s) = registry.get_mut(id) else { continue };
            m.bus.publish(Notification::HelpAccepted {
                squad:           s.id,
                callsign:        s.callsign.clone(),
                caller_callsign: caller_callsign.clone(),
            });
            let secs = m.config.help_pursue_secs;
            m.investigate(s, pos, secs);
        }
    }

    /// Mark a node destroyed.  Squads heading there drop their target and
    /// choose another on their next idle evaluation.
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        let Some(graph) = self.graph.as_mut() else {
            return false;
        };
        if !graph.remove_node(node) {
            return false;
        }
        info!(%node, "node removed");
        for s in self.registry.iter_mut().filter(|s| !s.is_garrison && s.target == Some(node)) {
            s.target = None;
            s.clear_path();
        }
        true
    }

    // ── World lifecycle ───────────────────────────────────────────────────

    /// Replace the world: rebuild the graph, discard every squad, and
    /// populate the new world from `self.spawn`.
    pub fn regenerate_world(&mut self, data: &WorldData) -> SimResult<Vec<SquadId>> {
        let graph = WorldGraph::from_data(data)?;
        let (nodes, roads) = (graph.node_count(), data.roads.len());
        info!(nodes, roads, "world rebuilt");

        self.graph = Some(graph);
        self.registry.clear();
        self.scheduler.reset();
        self.health.reset();
        self.bus.publish(Notification::WorldRebuilt { nodes, roads });
        self.populate()
    }

    /// Spawn garrisons and mobile squads into the current world, then give
    /// each one its initial orders.
    pub fn populate(&mut self) -> SimResult<Vec<SquadId>> {
        let Some(graph) = self.graph.as_ref() else {
            return Ok(Vec::new());
        };
        let ids = SquadSpawner::new(&self.spawn).populate(&mut self.registry, graph, &mut self.dice)?;
        for &id in &ids {
            if let Some(s) = self.registry.get(id) {
                self.bus.publish(spawned(s));
            }
        }
        self.assign_initial_orders(&ids);
        Ok(ids)
    }

    /// Insert a host-built squad.  Mobile squads get their region from the
    /// current world.
    pub fn spawn_squad(&mut self, mut squad: Squad) -> SimResult<SquadId> {
        if !squad.is_garrison {
            if let Some(graph) = self.graph.as_ref() {
                squad.region = graph.region_at(squad.pos);
            }
        }
        let id = self.registry.insert(squad)?;
        if let Some(s) = self.registry.get(id) {
            self.bus.publish(spawned(s));
        }
        Ok(id)
    }

    fn assign_initial_orders(&mut self, ids: &[SquadId]) {
        let Some((mut m, registry)) = self.split() else { return };
        for &id in ids {
            let Some(s) = registry.get_mut(id) else { continue };
            if s.is_garrison {
                s.state = AiState::Idle;
                s.target = s.anchor;
            } else {
                m.pick_new_target(s);
            }
        }
    }
}

fn spawned(s: &Squad) -> Notification {
    Notification::SquadSpawned {
        squad:       s.id,
        callsign:    s.callsign.clone(),
        pos:         s.pos,
        region:      s.region,
        is_garrison: s.is_garrison,
    }
}
