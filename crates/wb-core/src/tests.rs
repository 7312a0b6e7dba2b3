//! Unit tests for wb-core primitives.

#[cfg(test)]
mod ids {
    use crate::{NodeId, SquadId};

    #[test]
    fn index_roundtrip() {
        let id = SquadId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(SquadId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(SquadId::INVALID.0, u32::MAX);
        assert!(!NodeId::default().is_valid());
        assert!(NodeId(3).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Compass, Vec2};

    #[test]
    fn distance_and_length() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
        assert!((b.length_sq() - 25.0).abs() < 1e-6);
    }

    #[test]
    fn normalized_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let n = Vec2::new(10.0, 0.0).normalized();
        assert!((n.x - 1.0).abs() < 1e-6 && n.y.abs() < 1e-6);
    }

    #[test]
    fn perp_is_orthogonal() {
        let v = Vec2::new(2.0, 1.0);
        let p = v.perp();
        assert!((v.x * p.x + v.y * p.y).abs() < 1e-6);
        assert!((p.length() - v.length()).abs() < 1e-6);
    }

    #[test]
    fn compass_cardinals() {
        let o = Vec2::ZERO;
        assert_eq!(Compass::between(o, Vec2::new(0.0, 10.0)), Compass::North);
        assert_eq!(Compass::between(o, Vec2::new(10.0, 0.0)), Compass::East);
        assert_eq!(Compass::between(o, Vec2::new(0.0, -10.0)), Compass::South);
        assert_eq!(Compass::between(o, Vec2::new(-10.0, 0.0)), Compass::West);
        assert_eq!(Compass::between(o, Vec2::new(10.0, 10.0)), Compass::NorthEast);
        assert_eq!(Compass::between(o, Vec2::new(-10.0, -10.0)), Compass::SouthWest);
    }

    #[test]
    fn compass_coincident_reads_north() {
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(Compass::between(p, p), Compass::North);
        assert_eq!(Compass::NorthWest.index(), 7);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick, TickScheduler, MAX_CATCH_UP_TICKS};

    #[test]
    fn clock_seconds_follow_ticks() {
        let mut clock = SimClock::new(5.0);
        assert_eq!(clock.now_secs(), 0.0);
        for _ in 0..10 {
            clock.advance();
        }
        assert_eq!(clock.current_tick, Tick(10));
        assert!((clock.now_secs() - 2.0).abs() < 1e-9);
        assert!((clock.tick_secs() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn scheduler_accumulates_fractional_updates() {
        let mut s = TickScheduler::new(5.0);
        // 0.1 s at 5 Hz = half a tick.
        assert_eq!(s.advance(0.1), 0);
        assert_eq!(s.advance(0.1), 1);
        assert!(s.pending() < 1e-9);
    }

    #[test]
    fn scheduler_catches_up_after_stall() {
        let mut s = TickScheduler::new(5.0);
        assert_eq!(s.advance(1.0), 5);
        assert_eq!(s.advance(0.0), 0);
    }

    #[test]
    fn scheduler_caps_a_huge_stall() {
        let mut s = TickScheduler::new(5.0);
        assert_eq!(s.advance(1e16), MAX_CATCH_UP_TICKS);
        assert!(s.pending() < 1.0);
        assert_eq!(s.advance(1e300), MAX_CATCH_UP_TICKS);
        // Excess is dropped rather than carried into later updates.
        assert_eq!(s.advance(0.0), 0);
        assert_eq!(s.advance(0.2), 1);
    }

    #[test]
    fn scheduler_ignores_bad_input() {
        let mut s = TickScheduler::new(5.0);
        assert_eq!(s.advance(-3.0), 0);
        assert_eq!(s.advance(f64::NAN), 0);
        s.advance(0.1);
        s.reset();
        assert_eq!(s.pending(), 0.0);
    }
}

#[cfg(test)]
mod rng {
    use crate::{Dice, FixedDice, SimRng};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(99);
        let mut b = SimRng::new(99);
        for _ in 0..16 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let mut r = SimRng::new(7);
        for _ in 0..1_000 {
            let v = r.range_i32(4, 9);
            assert!((4..=9).contains(&v));
            let f = r.range_f32(1.2, 2.2);
            assert!((1.2..2.2).contains(&f));
            assert!(r.index(3) < 3);
            assert!(r.in_unit_disc().length() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn fixed_dice_forces_outcomes() {
        let mut yes = FixedDice::always(0.0);
        let mut no = FixedDice::never();
        assert!(yes.chance(0.01));
        assert!(!no.chance(0.99));
        assert_eq!(yes.range_i32(4, 9), 4);
        assert_eq!(no.range_i32(4, 9), 9);
        assert_eq!(no.index(5), 4);
        assert_eq!(yes.choose(&[10, 20, 30]), Some(&10));
        assert_eq!(yes.choose::<u8>(&[]), None);
    }
}

#[cfg(test)]
mod config {
    use crate::AiConfig;

    #[test]
    fn defaults_validate() {
        AiConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = AiConfig { tick_hz: 0.0, ..AiConfig::default() };
        assert!(cfg.validate().is_err());

        let cfg = AiConfig { base_damage: (9, 4), ..AiConfig::default() };
        assert!(cfg.validate().is_err());

        let cfg = AiConfig { hit_chance: 1.5, ..AiConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
