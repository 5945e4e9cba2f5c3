use super::Agent;
use crate::combatant::Combatant;
use crate::env::{Clip, Services};
use crate::outcome::DamageOutcome;
use crate::state::{AgentId, StrafeDirection};

pub(crate) const DEATH_SECTIONS: [&str; 2] = ["Death01", "Death02"];

impl Agent {
    /// Applies an incoming hit.
    ///
    /// Lethality is decided on the raw amount: a hit that would take health
    /// to zero kills regardless of blocking or dodging. Only non-lethal hits
    /// are mitigated by the active defensive state.
    pub fn take_damage(&mut self, amount: f32, svc: &mut Services<'_>) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }
        let amount = amount.max(0.0);

        if self.health - amount <= 0.0 {
            self.health = 0.0;
            self.death(svc);
            return DamageOutcome::Killed;
        }

        let applied = amount * self.defensive_state().damage_multiplier();
        self.health = (self.health - applied).clamp(0.0, self.config.max_health);
        tracing::debug!(
            agent = %self.id,
            raw = amount,
            applied,
            remaining = self.health,
            defense = %self.defensive_state(),
            "damage taken"
        );
        DamageOutcome::Applied {
            amount: applied,
            remaining: self.health,
        }
    }

    /// Enters the terminal state.
    ///
    /// Interrupts the current animation, plays a death variant, halts
    /// movement and cancels every pending timer. Returns `false` (and does
    /// nothing) if the agent was already dead.
    ///
    /// Clearing this agent from other agents' enemy references is the
    /// registry's job, see [`crate::ActorRegistry::forget_enemy`].
    pub fn death(&mut self, svc: &mut Services<'_>) -> bool {
        if !self.fsm.force_dead() {
            return false;
        }
        self.health = 0.0;

        svc.animation.stop_all(self.id, self.config.death_blend_out);
        let section = DEATH_SECTIONS[svc.rng.pick(DEATH_SECTIONS.len())];
        if let Err(err) = svc.animation.play_segment(self.id, Clip::Death, section) {
            tracing::warn!(agent = %self.id, %err, "death animation failed");
        }
        svc.navigation.stop_movement(self.id);
        self.cancel_timers(svc);

        self.clear_enemy();
        self.already_damaged.clear();
        self.attack_clip = None;
        self.pending_move = None;
        self.strafe_direction = StrafeDirection::None;

        tracing::info!(agent = %self.id, section, "agent died");
        true
    }

    /// Records that the attack in flight struck `victim`.
    ///
    /// Returns `true` only the first time `victim` is struck during the
    /// current attack; the set is cleared whenever a new attack starts.
    pub fn register_hit(&mut self, victim: AgentId) -> bool {
        if self.is_dead() || victim == self.id {
            return false;
        }
        self.already_damaged.insert(victim)
    }

    /// Damage dealt by one connecting melee hit.
    pub fn melee_damage(&self) -> f32 {
        self.config.melee_damage
    }
}
