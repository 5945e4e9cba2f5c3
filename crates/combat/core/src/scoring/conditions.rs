//! Per-ability condition terms.
//!
//! Conditions are recomputed from scratch on every evaluation tick; nothing is
//! cached across ticks. Each function returns the condition value when its
//! requirements hold and `0.0` otherwise.

use arrayvec::ArrayVec;

use super::{Ability, MAX_CONDITIONS};

/// Snapshot of the agent queries the scorer reads during one evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoringFacts {
    pub enemy_detected: bool,
    /// Enemy within melee reach.
    pub in_attack_range: bool,
    /// Enemy beyond melee reach but inside the ranged band.
    pub in_ranged_range: bool,
    /// The tracked enemy is currently mid-attack.
    pub enemy_attacking: bool,
    pub can_strafe: bool,
    pub can_block: bool,
    pub can_dodge: bool,
}

pub(crate) const SEEK: f32 = 0.9;
pub(crate) const STRAFE: f32 = 0.75;
pub(crate) const ATTACK: f32 = 0.6;
pub(crate) const RANGED_ATTACK: f32 = 0.4;
pub(crate) const ULTIMATE: f32 = 0.25;
pub(crate) const DODGE: f32 = 0.5;
pub(crate) const BLOCK: f32 = 0.6;

#[inline]
fn when(eligible: bool, value: f32) -> f32 {
    if eligible { value } else { 0.0 }
}

impl ScoringFacts {
    /// Condition values for `ability`, in the order they are multiplied.
    pub fn conditions(&self, ability: Ability) -> ArrayVec<f32, MAX_CONDITIONS> {
        let mut conditions = ArrayVec::new();
        conditions.push(match ability {
            Ability::Seek => self.seek(),
            Ability::Strafe => self.strafe(),
            Ability::Attack => self.attack(),
            Ability::RangedAttack => self.ranged_attack(),
            Ability::Ultimate => self.ultimate(),
            Ability::Dodge => self.dodge(),
            Ability::Block => self.block(),
        });
        conditions
    }

    /// Close the distance: only while nothing else can reach the enemy.
    fn seek(&self) -> f32 {
        when(
            self.enemy_detected && !self.in_attack_range && !self.in_ranged_range,
            SEEK,
        )
    }

    fn strafe(&self) -> f32 {
        when(self.enemy_detected && self.can_strafe, STRAFE)
    }

    fn attack(&self) -> f32 {
        when(self.enemy_detected && self.in_attack_range, ATTACK)
    }

    fn ranged_attack(&self) -> f32 {
        when(self.enemy_detected && self.in_ranged_range, RANGED_ATTACK)
    }

    fn ultimate(&self) -> f32 {
        when(self.enemy_detected && self.in_attack_range, ULTIMATE)
    }

    /// Reactive: only while the enemy is swinging.
    fn dodge(&self) -> f32 {
        when(self.enemy_attacking && self.can_dodge, DODGE)
    }

    fn block(&self) -> f32 {
        when(self.enemy_attacking && self.can_block, BLOCK)
    }
}
