use combat_core::{
    Ability, Actor, AgentId, Combatant, CommandOutcome, DamageOutcome, Evaluation,
    MoveRequestId, Perception, Release,
};

use super::{CombatWorld, agent_in};
use crate::error::{Result, RuntimeError};
use crate::events::CombatEvent;

impl CombatWorld {
    /// Runs one utility evaluation for `agent` right now.
    ///
    /// The periodic evaluation timer is left untouched.
    pub fn evaluate_now(&mut self, agent: AgentId) -> Result<Evaluation> {
        let before = self.observe(agent);
        let view = self.registry.enemy_view(agent);
        let ai = agent_in(&mut self.registry, agent)?;
        let evaluation = ai.evaluate(view.as_ref(), &mut self.backends.services());

        match &evaluation {
            Evaluation::Decided {
                ability,
                draw,
                outcome,
                ..
            } => {
                self.record(CombatEvent::AbilitySelected {
                    agent,
                    ability: *ability,
                    draw: *draw,
                    executed: outcome.is_executed(),
                });
                if outcome.is_executed() && matches!(ability, Ability::Seek | Ability::Strafe) {
                    self.record(CombatEvent::MoveIssued {
                        agent,
                        ability: Some(*ability),
                    });
                }
            }
            Evaluation::Idle {
                patrol: Some(CommandOutcome::Executed),
                ..
            } => {
                self.record(CombatEvent::MoveIssued {
                    agent,
                    ability: None,
                });
            }
            Evaluation::Dead | Evaluation::Busy(_) | Evaluation::Idle { .. } => {}
        }

        self.record_changes(agent, before);
        Ok(evaluation)
    }

    /// Completion signal for the action `actor` is performing.
    ///
    /// Hosts call this when an animation ends; the world also calls it when
    /// the action-timeout fallback fires.
    pub fn notify_action_finished(&mut self, actor: AgentId) -> Result<Release> {
        let before = self.observe(actor);
        let view = self.registry.enemy_view(actor);
        let mut svc = self.backends.services();
        let release = match self.registry.get_mut(actor) {
            Some(Actor::Ai(agent)) => agent.set_unoccupied(view.as_ref(), &mut svc),
            Some(Actor::Player(player)) => player.set_unoccupied(&mut svc),
            None => return Err(RuntimeError::UnknownAgent(actor)),
        };

        self.record_changes(actor, before);
        Ok(release)
    }

    /// Delivers a sight/hearing stimulus of `observed` to `observer`.
    pub fn perceive(
        &mut self,
        observer: AgentId,
        observed: AgentId,
        strength: f32,
    ) -> Result<Perception> {
        let view = self
            .registry
            .target_view(observed)
            .ok_or(RuntimeError::UnknownAgent(observed))?;
        let before = self.observe(observer);

        let agent = agent_in(&mut self.registry, observer)?;
        let perception = agent.on_actor_observed(&view, strength, &mut self.backends.services());

        let enemy = self.registry.enemy_view(observer);
        agent_in(&mut self.registry, observer)?.refresh_ranges(enemy.as_ref());

        if let Perception::Detected(enemy) = perception {
            tracing::info!(agent = %observer, %enemy, "enemy detected");
        }
        self.record_changes(observer, before);
        Ok(perception)
    }

    /// Applies `amount` of raw damage to `target`. `source` is only used for
    /// reporting.
    ///
    /// A lethal hit runs the death sequence and clears the victim from every
    /// other agent's enemy reference.
    pub fn apply_damage(
        &mut self,
        target: AgentId,
        amount: f32,
        source: Option<AgentId>,
    ) -> Result<DamageOutcome> {
        let before = self.observe(target);
        let mut svc = self.backends.services();
        let (health_before, outcome) = match self.registry.get_mut(target) {
            Some(Actor::Ai(agent)) => (agent.health(), agent.take_damage(amount, &mut svc)),
            Some(Actor::Player(player)) => (player.health(), player.take_damage(amount, &mut svc)),
            None => return Err(RuntimeError::UnknownAgent(target)),
        };

        match outcome {
            DamageOutcome::Applied { amount, remaining } => {
                self.record(CombatEvent::DamageApplied {
                    target,
                    source,
                    amount,
                    remaining,
                });
            }
            DamageOutcome::Killed => {
                self.record(CombatEvent::DamageApplied {
                    target,
                    source,
                    amount: health_before,
                    remaining: 0.0,
                });
                self.record_changes(target, before);
                self.record(CombatEvent::Died {
                    actor: target,
                    killer: source,
                });
                self.on_death(target);
                return Ok(outcome);
            }
            DamageOutcome::Ignored => {}
        }

        self.record_changes(target, before);
        Ok(outcome)
    }

    /// The hit window of `attacker`'s swing opened: sweep once and damage
    /// whatever enemy the sweep struck, at most once per attack.
    ///
    /// Returns `None` when nothing new was struck.
    pub fn damage_trace(&mut self, attacker: AgentId) -> Result<Option<DamageOutcome>> {
        let attacking = self
            .registry
            .combatant(attacker)
            .ok_or(RuntimeError::UnknownAgent(attacker))?
            .is_attacking();
        if !attacking {
            return Ok(None);
        }

        let Some(victim) = self.backends.trace.sweep(attacker, &self.registry) else {
            return Ok(None);
        };
        let hostile = match (
            self.registry.combatant(attacker),
            self.registry.combatant(victim),
        ) {
            (Some(attacker), Some(victim)) => attacker.is_enemy(victim),
            _ => false,
        };
        if !hostile {
            return Ok(None);
        }

        let damage = match self.registry.get_mut(attacker) {
            Some(Actor::Ai(agent)) => agent.register_hit(victim).then(|| agent.melee_damage()),
            Some(Actor::Player(player)) => {
                player.register_hit(victim).then(|| player.melee_damage())
            }
            None => None,
        };
        let Some(damage) = damage else {
            return Ok(None);
        };

        tracing::debug!(%attacker, %victim, damage, "swing connected");
        self.apply_damage(victim, damage, Some(attacker)).map(Some)
    }

    /// Navigation finished the move order `request` issued for `agent`.
    ///
    /// Returns `true` if the agent was released from patrol.
    pub fn on_move_completed(
        &mut self,
        agent: AgentId,
        request: MoveRequestId,
        success: bool,
    ) -> Result<bool> {
        let before = self.observe(agent);
        let released = match self.registry.get_mut(agent) {
            Some(Actor::Ai(ai)) => {
                ai.move_completed(request, success, &mut self.backends.services())
            }
            Some(Actor::Player(_)) => false,
            None => return Err(RuntimeError::UnknownAgent(agent)),
        };
        self.record_changes(agent, before);
        Ok(released)
    }

    fn on_death(&mut self, actor: AgentId) {
        self.forget_everywhere(actor);
        let cancelled = self.backends.timers.cancel_agent(actor);
        tracing::info!(%actor, cancelled, "actor died");
    }
}
