//! The player's health pool.

/// Result of applying one hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DamageReport {
    pub amount: i32,
    pub hp_now: i32,
    /// `true` only for the hit that took the pool to zero.
    pub died_now: bool,
}

/// Player hit points.  Death is reported exactly once.
#[derive(Clone, Debug)]
pub struct PlayerHealth {
    hp:     i32,
    max_hp: i32,
}

impl PlayerHealth {
    pub const DEFAULT_MAX: i32 = 100;

    pub fn new(max_hp: i32) -> Self {
        let max_hp = max_hp.max(1);
        Self { hp: max_hp, max_hp }
    }

    #[inline]
    pub fn hp(&self) -> i32 {
        self.hp
    }

    #[inline]
    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Subtract `amount` (negative amounts are ignored), clamping at zero.
    pub fn apply_damage(&mut self, amount: i32) -> DamageReport {
        let was_alive = !self.is_dead();
        self.hp = (self.hp - amount.max(0)).max(0);
        DamageReport {
            amount: amount.max(0),
            hp_now: self.hp,
            died_now: was_alive && self.is_dead(),
        }
    }

    /// Back to full health (respawn).
    pub fn reset(&mut self) {
        self.hp = self.max_hp;
    }
}

impl Default for PlayerHealth {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX)
    }
}
