//! Per-squad control state machine.
//!
//! # Mobile squads
//!
//! ```text
//!  detected & admitted ──► Engage ──(coward, close, roll)──► Return (flee)
//!        │                   │
//!        │         lost detection
//!        │                   ▼
//!  detected, not admitted  Pursue ──(timer expired)──► Return
//!        │                                              │
//!        ▼                                       arrived at target
//!      Return ◄──────── Idle / Patrol ◄─────────────────┘
//! ```
//!
//! Idle, Patrol, and Return squads travel along their waypoints, choosing a
//! new destination and planning a path whenever none remains.  Arrival may
//! resupply the destination and always clears the target.
//!
//! # Garrison squads
//!
//! Never move.  Engage and fire whenever the player is within detection
//! range, otherwise Idle.

use tracing::{debug, info};

use wb_behavior::ChaserSet;
use wb_combat::{CombatResolver, PlayerHealth, ShotBudget, ShotOutcome};
use wb_core::{AiConfig, Compass, Dice, NodeId, Vec2};
use wb_squad::{AiState, PathStep, Persona, Squad};
use wb_world::{plan_waypoints, Router, WorldGraph};

use crate::{DestinationKind, EventBus, Landmark, Notification, SupplyKind, TickReport};

/// Fraction of the stand-off radius inside which a cowardly squad may flee.
const COWARD_RETREAT_FRACTION: f32 = 0.8;

/// Supplies dropped at a node this tick, applied once the graph is writable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Delivery {
    pub node:   NodeId,
    pub supply: SupplyKind,
    pub amount: i32,
}

/// Split borrows of everything a squad decision may read or write, except
/// the registry itself.
pub(crate) struct Machine<'a, R: Router, D: Dice> {
    pub graph:  &'a WorldGraph,
    pub router: &'a R,
    pub config: &'a AiConfig,
    pub combat: &'a CombatResolver,
    pub dice:   &'a mut D,
    pub bus:    &'a EventBus,
    pub health: &'a mut PlayerHealth,
    pub now:    f64,
    pub player: Vec2,
}

impl<R: Router, D: Dice> Machine<'_, R, D> {
    #[inline]
    fn dt(&self) -> f32 {
        self.config.tick_secs()
    }

    // ── Tick evaluation ───────────────────────────────────────────────────

    pub fn step_garrison(&mut self, squad: &mut Squad, budget: &mut ShotBudget, report: &mut TickReport) {
        let was_in_combat = squad.in_combat;
        squad.in_combat = squad.pos.distance(self.player) <= squad.detection_radius;
        if squad.in_combat {
            squad.state = AiState::Engage;
            report.garrisons_engaged += 1;
            self.fire(squad, budget, report);
        } else {
            squad.state = AiState::Idle;
        }
        if squad.in_combat && !was_in_combat {
            self.announce_engaged(squad);
        }
    }

    pub fn step_mobile(
        &mut self,
        squad: &mut Squad,
        chasers: &ChaserSet,
        budget: &mut ShotBudget,
        report: &mut TickReport,
        deliveries: &mut Vec<Delivery>,
    ) {
        let was_in_combat = squad.in_combat;
        let dist = squad.pos.distance(self.player);
        let detecting = dist <= squad.detection_radius;

        if detecting && chasers.contains(squad.id) {
            squad.state = AiState::Engage;
            squad.in_combat = true;
            if !self.try_retreat(squad, dist) {
                report.engaged += 1;
                self.close_in(squad, dist);
                self.fire(squad, budget, report);
            }
        } else if detecting {
            // Spotted the player but the chaser slots are taken.
            squad.in_combat = false;
            if squad.target.is_none() {
                self.pick_new_target(squad);
            }
            squad.state = AiState::Return;
        } else if squad.in_combat {
            squad.in_combat = false;
            squad.pursue_until = self.now + f64::from(squad.persona.pursue_secs(self.config));
            squad.state = AiState::Pursue;
            // Any patrol route is stale; chase the player directly.
            squad.clear_path();
            debug!(squad = %squad.id, until = squad.pursue_until, "lost contact, pursuing");
        }

        if !squad.in_combat {
            self.travel(squad, deliveries);
        }
        if squad.in_combat && !was_in_combat {
            self.announce_engaged(squad);
        }
    }

    /// Cowardly squads inside the retreat band may break off toward the
    /// destination farthest from the player.  Returns `true` if they did.
    fn try_retreat(&mut self, squad: &mut Squad, dist: f32) -> bool {
        if squad.persona != Persona::Cowardly
            || dist >= self.config.stand_off_radius * COWARD_RETREAT_FRACTION
            || !self.dice.chance(self.config.coward_retreat_prob)
        {
            return false;
        }
        let Some(far) = self.graph.farthest_node_from(self.player) else {
            return false;
        };
        let far_pos = self.graph.node_pos[far.index()];
        squad.target = Some(far);
        squad.state = AiState::Return;
        squad.in_combat = false;
        squad.clear_path();
        debug!(squad = %squad.id, destination = %far, "retreating");
        self.bus.publish(Notification::RetreatDeclared {
            squad:       squad.id,
            callsign:    squad.callsign.clone(),
            destination: far,
            name:        self.graph.name(far).to_owned(),
            bearing:     Compass::between(squad.pos, far_pos),
        });
        true
    }

    /// Close to stand-off range, then circle the player with some jitter.
    fn close_in(&mut self, squad: &mut Squad, dist: f32) {
        let dt = self.dt();
        if dist > self.config.stand_off_radius {
            let dir = squad.pos.direction_to(self.player);
            squad.pos += dir * (squad.speed * self.config.approach_speed_factor * dt);
        } else {
            let lateral = (self.player - squad.pos).perp().normalized();
            let jitter = self.dice.in_unit_disc();
            squad.pos += lateral * (squad.speed * self.config.strafe_lateral_factor * dt)
                + jitter * (self.config.strafe_jitter * dt);
        }
    }

    /// Out-of-combat movement: timed pursuit, then patrol travel.
    fn travel(&mut self, squad: &mut Squad, deliveries: &mut Vec<Delivery>) {
        let step = squad.speed * self.dt();

        if squad.state == AiState::Pursue {
            if self.now <= squad.pursue_until {
                if squad.has_path() {
                    squad.advance_along_path(step);
                } else {
                    squad.step_toward(self.player, step);
                }
                return;
            }
            squad.state = AiState::Return;
            squad.clear_path();
            debug!(squad = %squad.id, "pursuit expired");
        }

        if !matches!(squad.state, AiState::Return | AiState::Patrol | AiState::Idle) {
            return;
        }
        if !squad.has_path() {
            if !squad.target.is_some_and(|t| self.graph.is_alive(t)) {
                self.pick_new_target(squad);
            }
            self.replan(squad);
        }
        if squad.advance_along_path(step) == PathStep::Arrived {
            if let Some(delivery) = self.try_resupply(squad) {
                deliveries.push(delivery);
            }
            squad.state = AiState::Patrol;
            squad.target = None;
        }
    }

    // ── Combat ────────────────────────────────────────────────────────────

    fn fire(&mut self, squad: &mut Squad, budget: &mut ShotBudget, report: &mut TickReport) {
        if self.health.is_dead() {
            return;
        }
        let outcome = self.combat.attempt(budget, squad, self.now, &mut *self.dice);
        if outcome.fired() {
            report.shots_fired += 1;
        }
        let ShotOutcome::Hit(damage) = outcome else { return };
        report.hits += 1;

        let hit = self.health.apply_damage(damage);
        self.bus.publish(Notification::PlayerDamaged { by: squad.id, amount: hit.amount, hp_now: hit.hp_now });
        if hit.died_now {
            info!(by = %squad.id, callsign = %squad.callsign, "player killed");
            self.bus.publish(Notification::PlayerDied { by: squad.id });
        }
    }

    fn announce_engaged(&self, squad: &Squad) {
        debug!(squad = %squad.id, "engaged");
        self.bus.publish(Notification::Engaged { squad: squad.id, callsign: squad.callsign.clone() });
    }

    // ── Destinations ──────────────────────────────────────────────────────

    /// Choose a random patrol destination, preferring cities with
    /// probability `city_target_bias`.  Falls back to the other pool when the
    /// preferred one is empty; leaves `target` empty when both are.
    pub fn pick_new_target(&mut self, squad: &mut Squad) {
        let cities = self.graph.city_pool();
        let camps = self.graph.camp_pool();
        let want_city = self.dice.chance(self.config.city_target_bias);
        let pool = if (want_city && !cities.is_empty()) || camps.is_empty() { &cities } else { &camps };
        let Some(&node) = self.dice.choose(pool) else {
            squad.target = None;
            return;
        };
        squad.target = Some(node);
        self.announce_planned(squad, node);
    }

    /// Send a squad out of an over-full region.
    pub fn redirect(&mut self, squad: &mut Squad, destination: NodeId) {
        squad.target = Some(destination);
        squad.state = AiState::Return;
        squad.in_combat = false;
        squad.clear_path();
        debug!(squad = %squad.id, %destination, "redirected out of crowded region");
        self.announce_planned(squad, destination);
    }

    /// Timed pursuit toward the road node nearest `pos`.
    pub fn investigate(&mut self, squad: &mut Squad, pos: Vec2, secs: f32) {
        squad.state = AiState::Pursue;
        squad.pursue_until = self.now + f64::from(secs);
        squad.target = self.graph.nearest_road_node(pos);
        squad.clear_path();
        self.replan(squad);
    }

    fn announce_planned(&self, squad: &Squad, node: NodeId) {
        let i = node.index();
        let pos = self.graph.node_pos[i];
        self.bus.publish(Notification::PlannedMove {
            squad:       squad.id,
            callsign:    squad.callsign.clone(),
            destination: node,
            name:        self.graph.node_name[i].clone(),
            kind:        DestinationKind::of(self.graph.node_kind[i]),
            pos,
            bearing:     Compass::between(squad.pos, pos),
        });
    }

    /// Plan waypoints to the current target.  An unreachable target is
    /// dropped so the next evaluation chooses another.
    fn replan(&mut self, squad: &mut Squad) {
        let Some(target) = squad.target else { return };
        let path = plan_waypoints(self.router, self.graph, squad.pos, target);
        if path.is_empty() {
            debug!(squad = %squad.id, %target, "target unreachable, dropping it");
            squad.target = None;
        }
        squad.set_path(path);
    }

    fn try_resupply(&mut self, squad: &Squad) -> Option<Delivery> {
        let node = squad.target?;
        let kind = self.graph.kind(node)?;
        if !kind.is_destination() || !self.dice.chance(self.config.resupply_prob) {
            return None;
        }
        let (supply, (lo, hi)) = if self.dice.chance(self.config.resupply_ammo_bias) {
            (SupplyKind::Ammo, self.config.resupply_ammo)
        } else {
            (SupplyKind::Meds, self.config.resupply_meds)
        };
        let amount = self.dice.range_i32(lo, hi);

        let pos = self.graph.node_pos[node.index()];
        let kind = DestinationKind::of(kind);
        let landmark = match kind {
            DestinationKind::Camp => self.graph.nearest_city_except(pos, node).map(|city| Landmark {
                node:    city,
                name:    self.graph.name(city).to_owned(),
                bearing: Compass::between(self.graph.node_pos[city.index()], pos),
            }),
            DestinationKind::City => None,
        };
        debug!(squad = %squad.id, %node, %supply, amount, "resupplied");
        self.bus.publish(Notification::Resupplied {
            squad: squad.id,
            callsign: squad.callsign.clone(),
            node,
            name: self.graph.name(node).to_owned(),
            kind,
            supply,
            amount,
            pos,
            landmark,
        });
        Some(Delivery { node, supply, amount })
    }
}
