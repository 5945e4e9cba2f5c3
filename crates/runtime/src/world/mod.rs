//! The simulation orchestrator.
//!
//! [`CombatWorld`] owns the actor registry, the collaborators and the timer
//! queue, and is the single entry point a host drives: it advances the clock,
//! routes collaborator reports and timer expiries to the right actor, and
//! records what happened as [`CombatEvent`]s.
//!
//! Everything runs on the caller's thread. Collaborator reports are applied
//! in the order navigation, animation, timers within one [`CombatWorld::advance`].
mod combat;
mod frame;
mod player;

use combat_content::ContentRegistry;
use combat_core::{
    Actor, ActorRegistry, Agent, AgentConfig, AgentId, AnimationService, CombatBehaviorProfile,
    CombatState, DamageTraceService, NavigationService, PlayerCharacter, Position, RngOracle,
};

use crate::error::{Result, RuntimeError};
use crate::events::{CombatEvent, EventLog, RecordedEvent};
use crate::services::{Backends, ReachTrace, SimAnimation, SimNavigation, StdRngOracle};

/// State and targeting of one actor, captured before an operation so the
/// world can report what the operation changed.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Observed {
    state: CombatState,
    enemy: Option<AgentId>,
}

pub struct CombatWorld {
    registry: ActorRegistry,
    backends: Backends,
    content: ContentRegistry,
    events: EventLog,
}

impl CombatWorld {
    pub fn builder() -> CombatWorldBuilder {
        CombatWorldBuilder::new()
    }

    // ===== queries =====

    /// Simulation time in seconds.
    pub fn now(&self) -> f64 {
        self.backends.timers.now()
    }

    pub fn registry(&self) -> &ActorRegistry {
        &self.registry
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.registry.agent(id)
    }

    pub fn player(&self, id: AgentId) -> Option<&PlayerCharacter> {
        self.registry.player(id)
    }

    pub fn content(&self) -> &ContentRegistry {
        &self.content
    }

    pub fn backends(&self) -> &Backends {
        &self.backends
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Takes every event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<RecordedEvent> {
        self.events.drain()
    }

    // ===== lifecycle =====

    /// Spawns an AI agent and arms its first evaluation.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::InvalidConfig`] if `config` or `profile` does not
    /// validate.
    pub fn spawn_agent(
        &mut self,
        config: AgentConfig,
        profile: CombatBehaviorProfile,
        position: Position,
    ) -> Result<AgentId> {
        config.validate()?;
        profile.validate()?;

        let team = config.team;
        let id = self
            .registry
            .spawn(|id| Agent::new(id, config, profile, position));
        if let Some(agent) = self.registry.agent_mut(id) {
            agent.schedule_evaluation(&mut self.backends.services());
        }

        tracing::info!(agent = %id, ?team, %position, "agent spawned");
        self.record(CombatEvent::Spawned { actor: id });
        Ok(id)
    }

    /// Spawns an agent from a named archetype in the loaded content.
    pub fn spawn_archetype(&mut self, name: &str, position: Position) -> Result<AgentId> {
        let archetype = self
            .content
            .archetype(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownArchetype(name.to_owned()))?;
        self.spawn_agent(archetype.config, archetype.profile, position)
    }

    /// Spawns an agent with explicit settings and a named profile.
    pub fn spawn_with_profile(
        &mut self,
        profile: &str,
        config: AgentConfig,
        position: Position,
    ) -> Result<AgentId> {
        let profile = *self
            .content
            .profile(profile)
            .ok_or_else(|| RuntimeError::UnknownProfile(profile.to_owned()))?;
        self.spawn_agent(config, profile, position)
    }

    pub fn spawn_player(&mut self, position: Position) -> AgentId {
        self.spawn_player_with(|id| PlayerCharacter::new(id, position))
    }

    /// Spawns a player built by `make`, which receives the player's handle.
    pub fn spawn_player_with(
        &mut self,
        make: impl FnOnce(AgentId) -> PlayerCharacter,
    ) -> AgentId {
        let id = self.registry.spawn(make);
        tracing::info!(player = %id, "player spawned");
        self.record(CombatEvent::Spawned { actor: id });
        id
    }

    /// Removes an actor. Its timers are cancelled, its movement and
    /// animation stopped, and every agent tracking it forgets it.
    pub fn despawn(&mut self, id: AgentId) -> Result<()> {
        if self.registry.get(id).is_none() {
            return Err(RuntimeError::UnknownAgent(id));
        }
        self.backends.timers.cancel_agent(id);
        self.backends.navigation.stop_movement(id);
        self.backends.animation.stop_all(id, 0.0);
        self.forget_everywhere(id);
        self.registry.despawn(id);

        tracing::info!(actor = %id, "actor despawned");
        self.record(CombatEvent::Despawned { actor: id });
        Ok(())
    }

    // ===== internals =====

    fn record(&mut self, event: CombatEvent) {
        let now = self.now();
        self.events.push(now, event);
    }

    fn observe(&self, id: AgentId) -> Option<Observed> {
        Some(match self.registry.get(id)? {
            Actor::Ai(agent) => Observed {
                state: agent.state(),
                enemy: agent.enemy(),
            },
            Actor::Player(player) => Observed {
                state: player.state(),
                enemy: None,
            },
        })
    }

    /// Records state and targeting changes of `id` since `before`.
    fn record_changes(&mut self, id: AgentId, before: Option<Observed>) {
        let (Some(before), Some(after)) = (before, self.observe(id)) else {
            return;
        };
        if before.state != after.state {
            self.record(CombatEvent::StateChanged {
                actor: id,
                from: before.state,
                to: after.state,
            });
        }
        if before.enemy != after.enemy {
            if let Some(enemy) = before.enemy {
                self.record(CombatEvent::EnemyLost { agent: id, enemy });
            }
            if let Some(enemy) = after.enemy {
                self.record(CombatEvent::EnemyDetected { agent: id, enemy });
            }
        }
    }

    /// Clears `id` from every agent's enemy reference.
    fn forget_everywhere(&mut self, id: AgentId) {
        let trackers: Vec<AgentId> = self
            .registry
            .iter()
            .filter(|(_, actor)| actor.as_agent().is_some_and(|agent| agent.enemy() == Some(id)))
            .map(|(tracker, _)| tracker)
            .collect();
        self.registry.forget_enemy(id);
        for agent in trackers {
            self.record(CombatEvent::EnemyLost { agent, enemy: id });
        }
    }
}

fn agent_in(registry: &mut ActorRegistry, id: AgentId) -> Result<&mut Agent> {
    match registry.get_mut(id) {
        Some(actor) => actor.as_agent_mut().ok_or(RuntimeError::NotAnAgent(id)),
        None => Err(RuntimeError::UnknownAgent(id)),
    }
}

fn player_in(registry: &mut ActorRegistry, id: AgentId) -> Result<&mut PlayerCharacter> {
    match registry.get_mut(id) {
        Some(actor) => actor.as_player_mut().ok_or(RuntimeError::NotAPlayer(id)),
        None => Err(RuntimeError::UnknownAgent(id)),
    }
}

/// Builder for [`CombatWorld`]. Collaborators not provided fall back to the
/// in-memory ones in [`crate::services`], seeded from [`Self::seed`].
pub struct CombatWorldBuilder {
    seed: u64,
    content: ContentRegistry,
    navigation: Option<Box<dyn NavigationService>>,
    animation: Option<Box<dyn AnimationService>>,
    trace: Option<Box<dyn DamageTraceService>>,
    rng: Option<Box<dyn RngOracle>>,
}

impl CombatWorldBuilder {
    fn new() -> Self {
        Self {
            seed: 0,
            content: ContentRegistry::default(),
            navigation: None,
            animation: None,
            trace: None,
            rng: None,
        }
    }

    /// Seed for the default collaborators and random source.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Content used by [`CombatWorld::spawn_archetype`] and
    /// [`CombatWorld::spawn_with_profile`]. Empty by default.
    pub fn content(mut self, content: ContentRegistry) -> Self {
        self.content = content;
        self
    }

    pub fn navigation(mut self, navigation: impl NavigationService + 'static) -> Self {
        self.navigation = Some(Box::new(navigation));
        self
    }

    pub fn animation(mut self, animation: impl AnimationService + 'static) -> Self {
        self.animation = Some(Box::new(animation));
        self
    }

    pub fn trace(mut self, trace: impl DamageTraceService + 'static) -> Self {
        self.trace = Some(Box::new(trace));
        self
    }

    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn build(self) -> CombatWorld {
        let seed = self.seed;
        let backends = Backends::new(
            self.navigation
                .unwrap_or_else(|| Box::new(SimNavigation::new(seed.rotate_left(32)))),
            self.animation
                .unwrap_or_else(|| Box::new(SimAnimation::default())),
            self.trace.unwrap_or_else(|| Box::new(ReachTrace::default())),
            self.rng
                .unwrap_or_else(|| Box::new(StdRngOracle::seeded(seed))),
        );
        tracing::debug!(seed, "combat world built");

        CombatWorld {
            registry: ActorRegistry::new(),
            backends,
            content: self.content,
            events: EventLog::new(),
        }
    }
}
