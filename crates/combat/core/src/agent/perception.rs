use super::Agent;
use crate::combatant::{Combatant, TargetView};
use crate::env::Services;
use crate::state::{AgentId, CombatState};

/// How a perception update changed the agent's targeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Perception {
    /// A new enemy is now tracked.
    Detected(AgentId),
    /// The tracked enemy was lost.
    Lost(AgentId),
    Unchanged,
}

impl Agent {
    /// Maps a sight/hearing stimulus onto the enemy reference.
    ///
    /// A positive stimulus from an enemy starts tracking it unless another
    /// enemy is already tracked. A non-positive stimulus from the tracked
    /// enemy drops it. Detecting an enemy interrupts patrol.
    pub fn on_actor_observed(
        &mut self,
        observed: &TargetView,
        strength: f32,
        svc: &mut Services<'_>,
    ) -> Perception {
        if self.is_dead() || observed.id == self.id {
            return Perception::Unchanged;
        }

        if strength > 0.0 {
            if !observed.is_enemy_of(self.config.team) {
                return Perception::Unchanged;
            }
            if self.enemy_detected && self.enemy.is_some() {
                return Perception::Unchanged;
            }

            self.enemy = Some(observed.id);
            self.enemy_detected = true;
            tracing::debug!(agent = %self.id, enemy = %observed.id, "enemy detected");

            if self.fsm.state() == CombatState::Patrol {
                svc.navigation.stop_movement(self.id);
                self.release(svc);
            }
            return Perception::Detected(observed.id);
        }

        if self.enemy == Some(observed.id) {
            self.clear_enemy();
            tracing::debug!(agent = %self.id, enemy = %observed.id, "enemy lost");
            return Perception::Lost(observed.id);
        }
        Perception::Unchanged
    }

    /// Recomputes the range flags from the live enemy.
    ///
    /// `target` is the resolved view of [`Agent::enemy`]. If the handle no
    /// longer resolves (`None`) the stale reference is dropped. A dead enemy
    /// keeps its reference until the next release but is never in range.
    pub fn refresh_ranges(&mut self, target: Option<&TargetView>) {
        self.in_attack_range = false;
        self.in_ranged_range = false;
        self.enemy_attacking = false;

        let Some(enemy) = self.enemy else {
            return;
        };
        let Some(target) = target.filter(|view| view.id == enemy) else {
            tracing::debug!(agent = %self.id, %enemy, "enemy handle stale, clearing");
            self.clear_enemy();
            return;
        };
        if target.is_dead || !self.enemy_detected {
            return;
        }

        let distance = self.position.distance(target.position);
        self.in_attack_range = distance <= self.config.attack_range;
        self.in_ranged_range =
            !self.in_attack_range && distance <= self.config.ranged_attack_range;
        self.enemy_attacking = target.is_attacking;
    }

    /// Drops the enemy reference if it points at `id`.
    pub fn forget_enemy(&mut self, id: AgentId) -> bool {
        if self.enemy != Some(id) {
            return false;
        }
        self.clear_enemy();
        true
    }

    pub(super) fn clear_enemy(&mut self) {
        self.enemy = None;
        self.enemy_detected = false;
        self.in_attack_range = false;
        self.in_ranged_range = false;
        self.enemy_attacking = false;
    }
}
