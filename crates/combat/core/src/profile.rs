//! Archetype propensities that bias ability scoring.

use crate::config::ConfigError;
use crate::scoring::Ability;

/// Per-archetype combat personality: one propensity weight in `[0, 1]` for each
/// ability the archetype can bias.
///
/// Profiles are immutable once loaded and shared read-only by every agent of
/// the archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatBehaviorProfile {
    pub attack: f32,
    pub block: f32,
    pub dodge: f32,
    pub ranged_attack: f32,
    pub ultimate_attack: f32,
}

impl CombatBehaviorProfile {
    pub const fn new(
        attack: f32,
        block: f32,
        dodge: f32,
        ranged_attack: f32,
        ultimate_attack: f32,
    ) -> Self {
        Self {
            attack,
            block,
            dodge,
            ranged_attack,
            ultimate_attack,
        }
    }

    /// Every ability at full propensity.
    pub const fn uniform(weight: f32) -> Self {
        Self::new(weight, weight, weight, weight, weight)
    }

    /// Close-quarters brawler that rarely bothers defending.
    pub const BRAWLER: Self = Self::new(0.9, 0.2, 0.3, 0.1, 0.4);
    /// Keeps its distance and prefers ranged pressure.
    pub const SKIRMISHER: Self = Self::new(0.4, 0.3, 0.6, 0.9, 0.2);
    /// Turtles behind blocks and dodges, attacking opportunistically.
    pub const DEFENDER: Self = Self::new(0.4, 0.9, 0.7, 0.2, 0.1);

    /// Weight that multiplies the conditions of `ability`.
    ///
    /// Movement abilities carry no archetype bias and always weigh `1.0`.
    pub const fn weight(&self, ability: Ability) -> f32 {
        match ability {
            Ability::Seek | Ability::Strafe => 1.0,
            Ability::Attack => self.attack,
            Ability::RangedAttack => self.ranged_attack,
            Ability::Ultimate => self.ultimate_attack,
            Ability::Dodge => self.dodge,
            Ability::Block => self.block,
        }
    }

    /// Rejects weights outside `[0, 1]` (including NaN).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WeightOutOfRange`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("attack", self.attack),
            ("block", self.block),
            ("dodge", self.dodge),
            ("ranged_attack", self.ranged_attack),
            ("ultimate_attack", self.ultimate_attack),
        ];
        for (field, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::WeightOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

impl Default for CombatBehaviorProfile {
    fn default() -> Self {
        Self::BRAWLER
    }
}
