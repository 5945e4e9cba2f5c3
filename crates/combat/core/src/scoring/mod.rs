//! Utility scoring for combat abilities.
//!
//! Every evaluation tick each ability gets a desirability in `[0, 1]` built from
//! two ingredients:
//!
//! - **weight**: the archetype propensity for the ability
//!   ([`crate::CombatBehaviorProfile::weight`])
//! - **conditions**: zero or more situational factors in `[0, 1]`, where `0`
//!   means a hard requirement failed
//!
//! ## Score Formula
//!
//! ```text
//! raw      = weight × c1 × c2 × … × cn        (0 as soon as any factor is 0)
//! modifier = 1 − 1/n                           (n = 0 ⇒ no makeup)
//! makeup   = (1 − raw) × modifier
//! score    = raw + makeup × raw
//! ```
//!
//! The makeup term pulls multi-condition products back up from the small values
//! that multiplying several sub-unity factors produces, so abilities with
//! different numbers of conditions stay comparable.

mod conditions;
mod scorer;

pub use conditions::ScoringFacts;
pub use scorer::AbilityScorer;

use arrayvec::ArrayVec;

/// Maximum number of conditions attached to a single ability score.
pub const MAX_CONDITIONS: usize = 4;

/// Abilities the selector can dispatch, in scan order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Ability {
    Seek,
    Strafe,
    Attack,
    RangedAttack,
    Ultimate,
    Dodge,
    Block,
}

impl Ability {
    /// All abilities in selector scan order.
    pub const ALL: [Ability; 7] = [
        Self::Seek,
        Self::Strafe,
        Self::Attack,
        Self::RangedAttack,
        Self::Ultimate,
        Self::Dodge,
        Self::Block,
    ];

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// Weighted-product score for a single ability.
#[derive(Clone, Debug, PartialEq)]
pub struct Score {
    /// Archetype propensity in `[0, 1]`.
    pub weight: f32,
    /// Situational factors, each in `[0, 1]`.
    pub conditions: ArrayVec<f32, MAX_CONDITIONS>,
}

impl Score {
    pub fn new(weight: f32) -> Self {
        Self {
            weight,
            conditions: ArrayVec::new(),
        }
    }

    /// Appends a condition (builder pattern). Extra conditions beyond
    /// [`MAX_CONDITIONS`] are folded into the last slot multiplicatively so the
    /// raw product is preserved.
    #[must_use]
    pub fn with_condition(mut self, value: f32) -> Self {
        if let Err(overflow) = self.conditions.try_push(value) {
            if let Some(last) = self.conditions.last_mut() {
                *last *= overflow.element();
            }
        }
        self
    }

    /// Computes the final renormalized score.
    pub fn value(&self) -> f32 {
        score_ability(self.weight, &self.conditions)
    }
}

/// Combines a behaviour weight with condition values.
///
/// Returns exactly `0.0` if the weight or any condition is `0` (or negative),
/// never a small positive epsilon. The result is clamped to `[0, 1]`.
pub fn score_ability(weight: f32, conditions: &[f32]) -> f32 {
    let mut raw = weight;
    if raw <= 0.0 {
        return 0.0;
    }
    for &condition in conditions {
        raw *= condition;
        if raw <= 0.0 {
            return 0.0;
        }
    }

    let raw = raw.min(1.0);
    if conditions.is_empty() {
        return raw;
    }

    let modifier = 1.0 - 1.0 / conditions.len() as f32;
    let makeup = (1.0 - raw) * modifier;
    (raw + makeup * raw).clamp(0.0, 1.0)
}

/// One score per [`Ability`], indexed by [`Ability::as_index`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AbilityScores([f32; Ability::ALL.len()]);

impl AbilityScores {
    pub const fn zero() -> Self {
        Self([0.0; Ability::ALL.len()])
    }

    pub fn from_array(values: [f32; Ability::ALL.len()]) -> Self {
        Self(values)
    }

    #[inline]
    pub fn get(&self, ability: Ability) -> f32 {
        self.0[ability.as_index()]
    }

    #[inline]
    pub fn set(&mut self, ability: Ability, value: f32) {
        self.0[ability.as_index()] = value;
    }

    /// Iterates `(ability, score)` pairs in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, f32)> + '_ {
        Ability::ALL.iter().map(|&ability| (ability, self.get(ability)))
    }

    /// True if no ability is eligible.
    pub fn is_all_zero(&self) -> bool {
        self.0.iter().all(|&score| score <= 0.0)
    }
}
