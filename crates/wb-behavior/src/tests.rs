//! Unit tests for wb-behavior.

#[cfg(test)]
mod helpers {
    use wb_core::{NodeId, RegionId, Vec2};
    use wb_squad::{Persona, Squad, SquadRegistry};
    use wb_world::{NodeKind, NodeSpec, WorldGraph, WorldGraphBuilder};

    /// Two regions: cities at x = 0 (region 0) and x = 5000 (region 1), plus
    /// a camp in region 1.
    pub fn two_region_graph() -> WorldGraph {
        let mut b = WorldGraphBuilder::new();
        b.add_node(NodeSpec::new("West", Vec2::new(0.0, 0.0), NodeKind::City, RegionId(0)));
        b.add_node(NodeSpec::new("East", Vec2::new(5000.0, 0.0), NodeKind::City, RegionId(1)));
        b.add_node(NodeSpec::new("Hollow", Vec2::new(5200.0, 300.0), NodeKind::Camp, RegionId(1)));
        b.build()
    }

    pub fn mobile(name: &str, pos: Vec2, persona: Persona) -> Squad {
        Squad::mobile(name, pos, RegionId(0), persona)
    }

    pub fn registry(squads: Vec<Squad>) -> SquadRegistry {
        let mut reg = SquadRegistry::new();
        for s in squads {
            reg.insert(s).unwrap();
        }
        reg
    }

    pub fn garrison(name: &str, pos: Vec2) -> Squad {
        Squad::garrison(name, NodeId(0), pos, RegionId(0))
    }
}

// ── Chaser admission ──────────────────────────────────────────────────────────

#[cfg(test)]
mod chasers {
    use wb_core::{SquadId, Vec2};
    use wb_squad::Persona;
    use super::helpers::{garrison, mobile, registry};
    use crate::ChaserSet;

    #[test]
    fn nearest_detecting_squads_are_admitted() {
        let reg = registry(vec![
            mobile("Far", Vec2::new(1400.0, 0.0), Persona::Neutral),
            mobile("Near", Vec2::new(200.0, 0.0), Persona::Neutral),
            mobile("Mid", Vec2::new(800.0, 0.0), Persona::Neutral),
            mobile("Blind", Vec2::new(3000.0, 0.0), Persona::Neutral),
        ]);
        let set = ChaserSet::admit(&reg, Vec2::ZERO, 2);
        assert_eq!(set.ids(), &[SquadId(1), SquadId(2)]);
        assert!(!set.contains(SquadId(0)));
        assert!(!set.contains(SquadId(3)));
    }

    #[test]
    fn equal_distance_ties_go_to_lower_id() {
        let reg = registry(vec![
            mobile("A", Vec2::new(1000.0, 0.0), Persona::Aggressive),
            mobile("C", Vec2::new(-1000.0, 0.0), Persona::Cowardly),
        ]);
        let set = ChaserSet::admit(&reg, Vec2::ZERO, 1);
        assert_eq!(set.len(), 1);
        assert!(set.contains(SquadId(0)));
    }

    #[test]
    fn garrisons_are_never_chasers() {
        let reg = registry(vec![garrison("Post-1", Vec2::new(10.0, 0.0))]);
        assert!(ChaserSet::admit(&reg, Vec2::ZERO, 5).is_empty());
    }

    #[test]
    fn zero_cap_admits_nobody() {
        let reg = registry(vec![mobile("A", Vec2::new(10.0, 0.0), Persona::Neutral)]);
        assert!(ChaserSet::admit(&reg, Vec2::ZERO, 0).is_empty());
    }
}

// ── Separation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod separation {
    use wb_core::{AiConfig, FixedDice, SquadId, Vec2};
    use wb_squad::Persona;
    use super::helpers::{garrison, mobile, registry, two_region_graph};
    use crate::{separation_deltas, TickContext};

    #[test]
    fn close_pair_pushes_apart_symmetrically() {
        let g = two_region_graph();
        let cfg = AiConfig::default();
        let ctx = TickContext::new(0.0, Vec2::ZERO, &g, &cfg);
        let reg = registry(vec![
            mobile("L", Vec2::new(-20.0, 0.0), Persona::Neutral),
            mobile("R", Vec2::new(20.0, 0.0), Persona::Neutral),
        ]);
        let deltas = separation_deltas(reg.as_slice(), &ctx, &mut FixedDice::always(0.5));
        assert_eq!(deltas.len(), 2);
        let step = 250.0 * 0.2;
        assert_eq!(deltas[0].0, SquadId(0));
        assert!((deltas[0].1.x + step).abs() < 1e-4, "left squad moves left");
        assert!((deltas[1].1.x - step).abs() < 1e-4, "right squad moves right");
    }

    #[test]
    fn distant_squads_and_garrisons_are_ignored() {
        let g = two_region_graph();
        let cfg = AiConfig::default();
        let ctx = TickContext::new(0.0, Vec2::ZERO, &g, &cfg);
        let reg = registry(vec![
            mobile("A", Vec2::new(0.0, 0.0), Persona::Neutral),
            mobile("B", Vec2::new(150.0, 0.0), Persona::Neutral),
            garrison("Post-1", Vec2::new(5.0, 0.0)),
        ]);
        assert!(separation_deltas(reg.as_slice(), &ctx, &mut FixedDice::always(0.5)).is_empty());
    }

    #[test]
    fn coincident_squads_get_a_random_push() {
        let g = two_region_graph();
        let cfg = AiConfig::default();
        let ctx = TickContext::new(0.0, Vec2::ZERO, &g, &cfg);
        let p = Vec2::new(40.0, 40.0);
        let reg = registry(vec![mobile("A", p, Persona::Neutral), mobile("B", p, Persona::Neutral)]);
        let deltas = separation_deltas(reg.as_slice(), &ctx, &mut FixedDice::always(0.9));
        assert_eq!(deltas.len(), 2);
        for (_, d) in deltas {
            assert!((d.length() - 50.0).abs() < 1e-3);
        }
    }
}

// ── Region cap ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod region_cap {
    use rustc_hash::FxHashMap;
    use wb_core::{AiConfig, FixedDice, RegionId, SimRng, SquadId, Vec2};
    use wb_squad::Persona;
    use super::helpers::{garrison, mobile, registry, two_region_graph};
    use crate::{plan_redirects, TickContext};

    #[test]
    fn excess_squads_leave_the_region() {
        let g = two_region_graph();
        let cfg = AiConfig::default();
        let ctx = TickContext::new(0.0, Vec2::ZERO, &g, &cfg);
        let mut squads: Vec<_> = (0..7)
            .map(|i| mobile(&format!("M{i}"), Vec2::new(i as f32 * 10.0, 0.0), Persona::Neutral))
            .collect();
        squads.push(garrison("West-1", Vec2::new(0.0, 120.0)));
        let reg = registry(squads);

        let redirects = plan_redirects(reg.as_slice(), &ctx, &mut SimRng::new(4));
        assert_eq!(redirects.len(), 2);
        assert_eq!(redirects[0].squad, SquadId(5));
        assert_eq!(redirects[1].squad, SquadId(6));
        for r in &redirects {
            assert_eq!(r.region, RegionId(0));
            assert_eq!(g.node_region[r.destination.index()], RegionId(1));
        }

        // After redirection no region holds more than the cap.
        let mut counts: FxHashMap<RegionId, usize> = FxHashMap::default();
        for s in reg.iter().filter(|s| !s.is_garrison) {
            let region = if redirects.iter().any(|r| r.squad == s.id) {
                g.node_region[redirects.iter().find(|r| r.squad == s.id).unwrap().destination.index()]
            } else {
                s.region
            };
            *counts.entry(region).or_default() += 1;
        }
        assert!(counts.values().all(|&c| c <= cfg.max_mobile_per_region));
    }

    #[test]
    fn under_cap_is_untouched() {
        let g = two_region_graph();
        let cfg = AiConfig::default();
        let ctx = TickContext::new(0.0, Vec2::ZERO, &g, &cfg);
        let reg = registry((0..5).map(|i| mobile(&format!("M{i}"), Vec2::ZERO, Persona::Neutral)).collect());
        assert!(plan_redirects(reg.as_slice(), &ctx, &mut FixedDice::always(0.0)).is_empty());
    }
}

// ── Reinforcement & hearing ───────────────────────────────────────────────────

#[cfg(test)]
mod reinforcement {
    use wb_core::{AiConfig, FixedDice, SquadId, Vec2};
    use wb_squad::Persona;
    use super::helpers::{garrison, mobile, registry};
    use crate::{hearing_responders, help_responders, nominate_caller};

    #[test]
    fn nearest_squad_in_range_calls() {
        let reg = registry(vec![
            mobile("A", Vec2::new(1000.0, 0.0), Persona::Neutral),
            garrison("Post-1", Vec2::new(300.0, 0.0)),
        ]);
        assert_eq!(nominate_caller(&reg, Vec2::ZERO, 2500.0), Some(SquadId(1)));
        assert_eq!(nominate_caller(&reg, Vec2::ZERO, 200.0), None);
        assert_eq!(nominate_caller(&registry(vec![]), Vec2::ZERO, 2500.0), None);
    }

    #[test]
    fn help_acceptance_follows_persona() {
        let reg = registry(vec![
            mobile("Coward", Vec2::new(100.0, 0.0), Persona::Cowardly),
            mobile("Plain", Vec2::new(200.0, 0.0), Persona::Neutral),
            mobile("Brute", Vec2::new(300.0, 0.0), Persona::Aggressive),
            mobile("Distant", Vec2::new(9000.0, 0.0), Persona::Aggressive),
            garrison("Post-1", Vec2::new(50.0, 0.0)),
        ]);
        // 0.5 beats only the neutral (0.55) and aggressive (0.85) thresholds.
        let ids = help_responders(&reg, Vec2::ZERO, 2500.0, &mut FixedDice::always(0.5));
        assert_eq!(ids, vec![SquadId(1), SquadId(2)]);
        assert!(help_responders(&reg, Vec2::ZERO, 2500.0, &mut FixedDice::never()).is_empty());
    }

    #[test]
    fn hearing_skips_fighting_and_far_squads() {
        let cfg = AiConfig::default();
        let mut reg = registry(vec![
            mobile("Busy", Vec2::new(100.0, 0.0), Persona::Aggressive),
            mobile("Idle", Vec2::new(2000.0, 0.0), Persona::Neutral),
            mobile("Deaf", Vec2::new(2300.0, 0.0), Persona::Aggressive),
            mobile("Timid", Vec2::new(10.0, 0.0), Persona::Cowardly),
        ]);
        reg.get_mut(SquadId(0)).unwrap().in_combat = true;

        let heard = hearing_responders(&reg, Vec2::ZERO, &cfg, &mut FixedDice::always(0.0));
        assert_eq!(heard, vec![SquadId(1), SquadId(3)]);

        // 0.35 passes neutral (0.5) but not cowardly (0.3).
        let heard = hearing_responders(&reg, Vec2::ZERO, &cfg, &mut FixedDice::always(0.35));
        assert_eq!(heard, vec![SquadId(1)]);
    }
}
