//! Behavioural profiles.

use std::fmt;

use wb_core::{AiConfig, Dice};

/// Behavioural profile fixed at squad creation.
///
/// Modulates pursuit duration, the retreat roll, and the probabilities of
/// answering a help request or investigating gunfire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Persona {
    Cowardly,
    Neutral,
    Aggressive,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Cowardly, Persona::Neutral, Persona::Aggressive];

    /// Seconds a squad keeps chasing after the player leaves detection range.
    pub fn pursue_secs(self, cfg: &AiConfig) -> f32 {
        match self {
            Persona::Cowardly   => cfg.pursue_secs_cowardly,
            Persona::Neutral    => cfg.pursue_secs_neutral,
            Persona::Aggressive => cfg.pursue_secs_aggressive,
        }
    }

    /// Multiplier on the base "heard shots" response probability.
    pub fn hearing_modifier(self) -> f32 {
        match self {
            Persona::Cowardly   => 0.6,
            Persona::Neutral    => 1.0,
            Persona::Aggressive => 1.2,
        }
    }

    /// Probability of answering a reinforcement request.
    pub fn help_acceptance(self) -> f32 {
        match self {
            Persona::Cowardly   => 0.30,
            Persona::Neutral    => 0.55,
            Persona::Aggressive => 0.85,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Draw a persona with relative `weights` (cowardly, neutral, aggressive).
    ///
    /// All-zero weights yield `Neutral`.
    pub fn roll(dice: &mut impl Dice, weights: [u32; 3]) -> Persona {
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return Persona::Neutral;
        }
        let r = (dice.unit() * total as f32) as u32;
        let mut acc = 0;
        for (p, w) in Persona::ALL.into_iter().zip(weights) {
            acc += w;
            if r < acc {
                return p;
            }
        }
        Persona::Aggressive
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Persona::Cowardly   => "cowardly",
            Persona::Neutral    => "neutral",
            Persona::Aggressive => "aggressive",
        })
    }
}
