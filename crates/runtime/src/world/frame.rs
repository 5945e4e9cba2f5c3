use combat_core::{Actor, AnimationEvent, NavigationEvent, TimerTask, TimerToken};

use super::{CombatWorld, agent_in};
use crate::events::CombatEvent;

impl CombatWorld {
    /// Advances the simulation by `dt` seconds.
    ///
    /// Locomotion and animation progress first, then every timer due by the
    /// end of the frame fires in time order.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        let until = self.now() + f64::from(dt);

        for event in self.backends.navigation.poll(dt) {
            self.route_navigation(event);
        }
        for event in self.backends.animation.poll(dt) {
            self.route_animation(event);
        }
        while let Some((token, task)) = self.backends.timers.pop_due(until) {
            self.route_timer(token, task);
        }
        self.backends.timers.advance_to(until);
    }

    fn route_navigation(&mut self, event: NavigationEvent) {
        match event {
            NavigationEvent::Moved {
                agent,
                position,
                yaw,
            } => {
                if let Some(actor) = self.registry.get_mut(agent) {
                    match actor {
                        Actor::Ai(ai) => ai.set_transform(position, yaw),
                        Actor::Player(player) => player.set_transform(position, yaw),
                    }
                }
            }
            NavigationEvent::Completed {
                agent,
                request,
                success,
            } => {
                if let Err(err) = self.on_move_completed(agent, request, success) {
                    tracing::debug!(%err, "dropping move completion");
                }
            }
        }
    }

    fn route_animation(&mut self, event: AnimationEvent) {
        let result = match event {
            AnimationEvent::HitWindow { agent } => self.damage_trace(agent).map(drop),
            AnimationEvent::Finished { agent } => self.notify_action_finished(agent).map(drop),
        };
        if let Err(err) = result {
            tracing::debug!(%err, ?event, "dropping animation notify");
        }
    }

    fn route_timer(&mut self, token: TimerToken, task: TimerTask) {
        match task {
            TimerTask::CooldownExpired { agent, cooldown } => {
                let Ok(ai) = agent_in(&mut self.registry, agent) else {
                    return;
                };
                if ai.cooldown_expired(cooldown, token) {
                    self.record(CombatEvent::CooldownReady { agent, cooldown });
                }
            }
            TimerTask::Evaluate { agent } => {
                if self.evaluate_now(agent).is_err() {
                    return;
                }
                if let Ok(ai) = agent_in(&mut self.registry, agent) {
                    ai.schedule_evaluation(&mut self.backends.services());
                }
            }
            TimerTask::ActionTimeout { agent } => {
                tracing::debug!(actor = %agent, "no completion signal, releasing");
                if let Err(err) = self.notify_action_finished(agent) {
                    tracing::debug!(%err, "dropping action timeout");
                }
            }
        }
    }
}
