#![allow(dead_code)]

use combat_core::{
    ActorRegistry, Agent, AgentConfig, AgentId, AnimationService, Clip, CombatBehaviorProfile,
    MoveOrder, MoveRequestId, NavigationService, PlayerCharacter, Position, Scheduler,
    ScriptedRng, ServiceError, Services,
};

/// Records every move order and can be told to refuse them.
#[derive(Default)]
pub struct RecordingNavigation {
    pub orders: Vec<MoveOrder>,
    pub stopped: Vec<AgentId>,
    pub refuse: bool,
    next_request: u64,
}

impl NavigationService for RecordingNavigation {
    fn random_point_in_radius(
        &mut self,
        origin: Position,
        radius: f32,
    ) -> Result<Position, ServiceError> {
        if self.refuse {
            return Err(ServiceError::NoNavigablePoint { origin, radius });
        }
        Ok(Position::new(origin.x + radius * 0.5, origin.y, origin.z))
    }

    fn move_to(&mut self, order: MoveOrder) -> Result<MoveRequestId, ServiceError> {
        if self.refuse {
            return Err(ServiceError::Unreachable {
                agent: order.agent,
                destination: order.destination,
            });
        }
        self.orders.push(order);
        self.next_request += 1;
        Ok(MoveRequestId(self.next_request))
    }

    fn stop_movement(&mut self, agent: AgentId) {
        self.stopped.push(agent);
    }
}

/// Records played segments and can simulate a missing clip.
#[derive(Default)]
pub struct RecordingAnimation {
    pub played: Vec<(AgentId, Clip, &'static str)>,
    pub stopped: Vec<(AgentId, f32)>,
    pub frozen: Vec<AgentId>,
    pub missing: bool,
}

impl RecordingAnimation {
    pub fn sections(&self, clip: Clip) -> Vec<&'static str> {
        self.played
            .iter()
            .filter(|(_, played, _)| *played == clip)
            .map(|(_, _, section)| *section)
            .collect()
    }
}

impl AnimationService for RecordingAnimation {
    fn play_segment(
        &mut self,
        agent: AgentId,
        clip: Clip,
        section: &'static str,
    ) -> Result<(), ServiceError> {
        if self.missing {
            return Err(ServiceError::MissingClip {
                clip: clip.into(),
                section,
            });
        }
        self.played.push((agent, clip, section));
        Ok(())
    }

    fn stop_all(&mut self, agent: AgentId, blend_out: f32) {
        self.stopped.push((agent, blend_out));
    }

    fn freeze(&mut self, agent: AgentId) {
        self.frozen.push(agent);
    }
}

#[derive(Default)]
pub struct Backends {
    pub navigation: RecordingNavigation,
    pub animation: RecordingAnimation,
    pub timers: Scheduler,
    pub rng: ScriptedRng,
}

impl Backends {
    pub fn services(&mut self) -> Services<'_> {
        Services::new(
            &mut self.navigation,
            &mut self.animation,
            &mut self.timers,
            &mut self.rng,
        )
    }
}

/// One AI agent facing the player across a small arena.
pub struct Fight {
    pub registry: ActorRegistry,
    pub backends: Backends,
    pub agent: AgentId,
    pub player: AgentId,
}

impl Fight {
    /// Agent at the origin, player `distance` units along +x.
    pub fn new(config: AgentConfig, profile: CombatBehaviorProfile, distance: f32) -> Self {
        let mut registry = ActorRegistry::new();
        let agent = registry.spawn(|id| Agent::new(id, config, profile, Position::ORIGIN));
        let player =
            registry.spawn(|id| PlayerCharacter::new(id, Position::new(distance, 0.0, 0.0)));
        Self {
            registry,
            backends: Backends::default(),
            agent,
            player,
        }
    }

    pub fn agent(&self) -> &Agent {
        self.registry.agent(self.agent).expect("agent alive")
    }

    /// Runs `f` against the agent with a fresh view of the player.
    pub fn with_agent<R>(
        &mut self,
        f: impl FnOnce(&mut Agent, Option<combat_core::TargetView>, &mut Services<'_>) -> R,
    ) -> R {
        let view = self.registry.target_view(self.player);
        let agent = self.registry.agent_mut(self.agent).expect("agent alive");
        let mut svc = self.backends.services();
        f(agent, view, &mut svc)
    }

    /// Makes the agent see the player and refreshes its ranges.
    pub fn detect_player(&mut self) {
        self.with_agent(|agent, view, svc| {
            let view = view.expect("player alive");
            agent.on_actor_observed(&view, 1.0, svc);
            agent.refresh_ranges(Some(&view));
        });
    }

    pub fn player_mut(&mut self) -> &mut PlayerCharacter {
        self.registry.player_mut(self.player).expect("player alive")
    }
}
