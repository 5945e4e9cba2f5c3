//! Combat events recorded by the world for the host to drain each frame.

use combat_core::{Ability, AgentId, CombatState, Cooldown};

/// Something observable that happened during a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    Spawned {
        actor: AgentId,
    },
    Despawned {
        actor: AgentId,
    },
    /// The selector picked `ability` with `draw`. `executed` is false when the
    /// command turned out to be a no-op or a collaborator refused it.
    AbilitySelected {
        agent: AgentId,
        ability: Ability,
        draw: f32,
        executed: bool,
    },
    StateChanged {
        actor: AgentId,
        from: CombatState,
        to: CombatState,
    },
    /// A movement order was issued on behalf of `ability`, or for patrol when
    /// `ability` is `None`.
    MoveIssued {
        agent: AgentId,
        ability: Option<Ability>,
    },
    DamageApplied {
        target: AgentId,
        source: Option<AgentId>,
        amount: f32,
        remaining: f32,
    },
    Died {
        actor: AgentId,
        killer: Option<AgentId>,
    },
    EnemyDetected {
        agent: AgentId,
        enemy: AgentId,
    },
    EnemyLost {
        agent: AgentId,
        enemy: AgentId,
    },
    CooldownReady {
        agent: AgentId,
        cooldown: Cooldown,
    },
}

impl CombatEvent {
    /// The actor the event is about.
    pub fn subject(&self) -> AgentId {
        match self {
            Self::Spawned { actor }
            | Self::Despawned { actor }
            | Self::StateChanged { actor, .. }
            | Self::Died { actor, .. } => *actor,
            Self::AbilitySelected { agent, .. }
            | Self::MoveIssued { agent, .. }
            | Self::EnemyDetected { agent, .. }
            | Self::EnemyLost { agent, .. }
            | Self::CooldownReady { agent, .. } => *agent,
            Self::DamageApplied { target, .. } => *target,
        }
    }
}

/// A [`CombatEvent`] stamped with the simulation time it happened at.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedEvent {
    pub time: f64,
    pub event: CombatEvent,
}

/// Append-only buffer of events since the last drain.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<RecordedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: f64, event: CombatEvent) {
        tracing::trace!(time, ?event, "combat event");
        self.events.push(RecordedEvent { time, event });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordedEvent> {
        self.events.iter()
    }

    /// Takes every recorded event, oldest first.
    pub fn drain(&mut self) -> Vec<RecordedEvent> {
        std::mem::take(&mut self.events)
    }
}
