//! Unit tests for wb-squad.

#[cfg(test)]
mod persona {
    use wb_core::{AiConfig, FixedDice};
    use crate::Persona;

    #[test]
    fn pursuit_is_ordered_by_boldness() {
        let cfg = AiConfig::default();
        assert_eq!(Persona::Cowardly.pursue_secs(&cfg), 3.0);
        assert_eq!(Persona::Neutral.pursue_secs(&cfg), 7.0);
        assert_eq!(Persona::Aggressive.pursue_secs(&cfg), 12.0);
        assert!(Persona::Cowardly.help_acceptance() < Persona::Aggressive.help_acceptance());
        assert!(Persona::Cowardly.hearing_modifier() < Persona::Aggressive.hearing_modifier());
    }

    #[test]
    fn roll_follows_weights() {
        let w = [30, 40, 30];
        assert_eq!(Persona::roll(&mut FixedDice::always(0.10), w), Persona::Cowardly);
        assert_eq!(Persona::roll(&mut FixedDice::always(0.50), w), Persona::Neutral);
        assert_eq!(Persona::roll(&mut FixedDice::always(0.95), w), Persona::Aggressive);
        assert_eq!(Persona::roll(&mut FixedDice::always(0.0), [0, 0, 0]), Persona::Neutral);
        assert_eq!(Persona::roll(&mut FixedDice::always(0.0), [0, 0, 5]), Persona::Aggressive);
    }
}

#[cfg(test)]
mod squad {
    use wb_core::{NodeId, RegionId, Vec2};
    use crate::{AiState, PathStep, Persona, Squad};

    fn scout() -> Squad {
        Squad::mobile("Scout", Vec2::ZERO, RegionId(0), Persona::Neutral)
    }

    #[test]
    fn new_squads_are_idle_without_path() {
        let s = scout();
        assert_eq!(s.state, AiState::Idle);
        assert!(!s.has_path());
        assert_eq!(s.path_index(), 0);
        assert!(s.target.is_none());
    }

    #[test]
    fn garrison_targets_its_anchor() {
        let g = Squad::garrison("Ostra-4", NodeId(3), Vec2::new(1.0, 1.0), RegionId(2));
        assert!(g.is_garrison);
        assert_eq!(g.anchor, Some(NodeId(3)));
        assert_eq!(g.target, Some(NodeId(3)));
        assert_eq!(g.persona, Persona::Neutral);
    }

    #[test]
    fn walks_and_snaps_along_path() {
        let mut s = scout();
        s.set_path(vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)]);

        // First waypoint is the squad's own position.
        assert_eq!(s.advance_along_path(4.0), PathStep::Waypoint);
        assert_eq!(s.advance_along_path(4.0), PathStep::Moving);
        assert_eq!(s.pos, Vec2::new(4.0, 0.0));
        assert_eq!(s.advance_along_path(4.0), PathStep::Moving);
        assert_eq!(s.advance_along_path(4.0), PathStep::Waypoint);
        assert_eq!(s.pos, Vec2::new(10.0, 0.0));
        assert_eq!(s.advance_along_path(100.0), PathStep::Arrived);
        assert_eq!(s.path_index(), s.path().len());
        assert_eq!(s.advance_along_path(100.0), PathStep::NoPath);
        assert!(s.path_index() <= s.path().len());
    }

    #[test]
    fn garrison_never_moves() {
        let start = Vec2::new(5.0, 5.0);
        let mut g = Squad::garrison("Ostra-1", NodeId(0), start, RegionId(0));
        g.set_path(vec![Vec2::new(50.0, 50.0)]);
        assert_eq!(g.advance_along_path(100.0), PathStep::NoPath);
        g.step_toward(Vec2::ZERO, 100.0);
        assert_eq!(g.pos, start);
    }

    #[test]
    fn step_toward_does_not_overshoot() {
        let mut s = scout();
        s.step_toward(Vec2::new(3.0, 4.0), 2.5);
        assert!((s.pos.length() - 2.5).abs() < 1e-5);
        s.step_toward(Vec2::new(3.0, 4.0), 100.0);
        assert_eq!(s.pos, Vec2::new(3.0, 4.0));
    }
}

#[cfg(test)]
mod registry {
    use wb_core::{NodeId, RegionId, SquadId, Vec2};
    use crate::{Persona, Squad, SquadError, SquadRegistry};

    fn mobile(name: &str, x: f32) -> Squad {
        Squad::mobile(name, Vec2::new(x, 0.0), RegionId(0), Persona::Neutral)
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let mut reg = SquadRegistry::new();
        let a = reg.insert(mobile("A", 0.0)).unwrap();
        let b = reg.insert(mobile("B", 1.0)).unwrap();
        assert_eq!((a, b), (SquadId(0), SquadId(1)));
        assert_eq!(reg.get(b).map(|s| s.id), Some(b));

        assert!(reg.remove(a).is_some());
        assert!(reg.remove(a).is_none());
        let c = reg.insert(mobile("C", 2.0)).unwrap();
        assert_eq!(c, SquadId(2));
        assert_eq!(reg.iter().map(|s| s.id).collect::<Vec<_>>(), vec![b, c]);
        assert!(!reg.contains(a));
    }

    #[test]
    fn rejects_duplicate_callsigns_until_removed() {
        let mut reg = SquadRegistry::new();
        let a = reg.insert(mobile("Wolf", 0.0)).unwrap();
        assert!(matches!(reg.insert(mobile("Wolf", 1.0)), Err(SquadError::DuplicateCallsign(_))));
        reg.remove(a);
        assert!(reg.insert(mobile("Wolf", 1.0)).is_ok());
    }

    #[test]
    fn nearest_and_garrison_counts() {
        let mut reg = SquadRegistry::new();
        let a = reg.insert(mobile("A", 100.0)).unwrap();
        reg.insert(mobile("B", 300.0)).unwrap();
        for n in 1..=3 {
            reg.insert(Squad::garrison(format!("Ostra-{n}"), NodeId(7), Vec2::new(900.0, 0.0), RegionId(0)))
                .unwrap();
        }
        let (id, d) = reg.nearest_to(Vec2::new(120.0, 0.0)).unwrap();
        assert_eq!(id, a);
        assert!((d - 20.0).abs() < 1e-4);
        assert_eq!(reg.garrison_count_at(NodeId(7)), 3);
        assert_eq!(reg.garrison_count_at(NodeId(8)), 0);
        assert!(SquadRegistry::new().nearest_to(Vec2::ZERO).is_none());
    }
}

#[cfg(test)]
mod spawner {
    use rustc_hash::FxHashSet;
    use wb_core::{NodeId, RegionId, SimRng, Vec2};
    use wb_world::{NodeKind, NodeSpec, WorldGraphBuilder, WorldGraph};
    use crate::{SpawnConfig, SquadRegistry, SquadSpawner};

    fn world() -> WorldGraph {
        let mut b = WorldGraphBuilder::new();
        b.add_node(NodeSpec::new("Varn", Vec2::new(0.0, 0.0), NodeKind::Capital, RegionId(0)).with_garrison(4));
        b.add_node(NodeSpec::new("Ostra", Vec2::new(2000.0, 0.0), NodeKind::City, RegionId(1)));
        b.add_node(NodeSpec::new("Kettle", Vec2::new(0.0, 2000.0), NodeKind::Camp, RegionId(2)).with_garrison(2));
        b.add_node(NodeSpec::new("Home", Vec2::new(500.0, 500.0), NodeKind::Base, RegionId(0)).with_garrison(9));
        b.build()
    }

    #[test]
    fn garrisons_ring_their_anchor() {
        let g = world();
        let mut reg = SquadRegistry::new();
        let cfg = SpawnConfig { mobile_squads: 0, ..SpawnConfig::default() };
        let ids = SquadSpawner::new(&cfg).populate(&mut reg, &g, &mut SimRng::new(3)).unwrap();
        assert_eq!(ids.len(), 6, "base garrisons are not spawned");

        for s in reg.iter() {
            let anchor = s.anchor.unwrap();
            let center = g.node_pos[anchor.index()];
            let ring = if anchor == NodeId(2) { 96.0 } else { 120.0 };
            // Nudging moves a squad at most 30 × 6 units off the ring.
            assert!((s.pos.distance(center) - ring).abs() <= 180.0 + 1e-3);
            assert!(s.callsign.starts_with(&g.node_name[anchor.index()]));
            let n: i32 = s.callsign.rsplit('-').next().unwrap().parse().unwrap();
            assert!((1..=30).contains(&n));
        }
        assert_eq!(reg.garrison_count_at(NodeId(0)), 4);
        assert_eq!(reg.garrison_count_at(NodeId(2)), 2);
    }

    #[test]
    fn mobiles_spawn_near_a_destination_with_unique_callsigns() {
        let g = world();
        let mut reg = SquadRegistry::new();
        let cfg = SpawnConfig { mobile_squads: 12, ..SpawnConfig::default() };
        SquadSpawner::new(&cfg).populate(&mut reg, &g, &mut SimRng::new(11)).unwrap();

        let mobiles: Vec<_> = reg.iter().filter(|s| !s.is_garrison).collect();
        assert_eq!(mobiles.len(), 12);
        let names: FxHashSet<&str> = reg.iter().map(|s| s.callsign.as_str()).collect();
        assert_eq!(names.len(), reg.len());

        for s in mobiles {
            let near = [NodeId(0), NodeId(1), NodeId(2)]
                .iter()
                .any(|n| g.node_pos[n.index()].distance(s.pos) <= 50.0 + 1e-3);
            assert!(near, "{} spawned at {}", s.callsign, s.pos);
            assert!((220.0..280.0).contains(&s.speed));
            assert_eq!(s.detection_radius, 1500.0);
            assert_eq!(s.firepower, cfg.firepower[s.persona.index()]);
        }
    }

    #[test]
    fn callsign_bank_is_used_first() {
        let g = world();
        let mut reg = SquadRegistry::new();
        let cfg = SpawnConfig {
            mobile_squads: 3,
            callsign_bank: vec!["Viper".into(), "Jackal".into()],
            ..SpawnConfig::default()
        };
        SquadSpawner::new(&cfg).populate(&mut reg, &g, &mut SimRng::new(5)).unwrap();
        let mobile_names: Vec<&str> =
            reg.iter().filter(|s| !s.is_garrison).map(|s| s.callsign.as_str()).collect();
        assert!(mobile_names.contains(&"Viper"));
        assert!(mobile_names.contains(&"Jackal"));
        assert_eq!(mobile_names.iter().filter(|n| n.starts_with("Hostile-")).count(), 1);
    }

    #[test]
    fn empty_world_spawns_nothing() {
        let g = WorldGraphBuilder::new().build();
        let mut reg = SquadRegistry::new();
        let ids = SquadSpawner::new(&SpawnConfig::default())
            .populate(&mut reg, &g, &mut SimRng::new(1))
            .unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn rejects_inverted_speed_range() {
        let cfg = SpawnConfig { speed_range: (300.0, 200.0), ..SpawnConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
