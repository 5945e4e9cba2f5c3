//! Generational storage for every actor in a fight.
//!
//! Actors refer to each other only through [`AgentId`] handles. A handle
//! carries the slot generation it was issued for, so once an actor is
//! despawned every outstanding handle resolves to `None` instead of aliasing
//! whatever is spawned into the slot next.

use crate::agent::Agent;
use crate::combatant::{Combatant, TargetView};
use crate::player::PlayerCharacter;
use crate::state::AgentId;

/// Anything that can occupy a registry slot.
#[derive(Clone, Debug)]
pub enum Actor {
    Ai(Box<Agent>),
    Player(PlayerCharacter),
}

impl Actor {
    pub fn as_combatant(&self) -> &dyn Combatant {
        match self {
            Self::Ai(agent) => &**agent,
            Self::Player(player) => player,
        }
    }

    pub fn as_agent(&self) -> Option<&Agent> {
        match self {
            Self::Ai(agent) => Some(&**agent),
            Self::Player(_) => None,
        }
    }

    pub fn as_agent_mut(&mut self) -> Option<&mut Agent> {
        match self {
            Self::Ai(agent) => Some(&mut **agent),
            Self::Player(_) => None,
        }
    }

    pub fn as_player(&self) -> Option<&PlayerCharacter> {
        match self {
            Self::Player(player) => Some(player),
            Self::Ai(_) => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerCharacter> {
        match self {
            Self::Player(player) => Some(player),
            Self::Ai(_) => None,
        }
    }
}

impl From<Agent> for Actor {
    fn from(agent: Agent) -> Self {
        Self::Ai(Box::new(agent))
    }
}

impl From<PlayerCharacter> for Actor {
    fn from(player: PlayerCharacter) -> Self {
        Self::Player(player)
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    actor: Option<Actor>,
}

#[derive(Clone, Debug, Default)]
pub struct ActorRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the actor built by `make`, which receives the handle the actor
    /// will be stored under.
    pub fn spawn<A, F>(&mut self, make: F) -> AgentId
    where
        A: Into<Actor>,
        F: FnOnce(AgentId) -> A,
    {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = AgentId::new(index, slot.generation);
        slot.actor = Some(make(id).into());
        tracing::debug!(%id, "actor spawned");
        id
    }

    pub fn get(&self, id: AgentId) -> Option<&Actor> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.actor.as_ref())
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Actor> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.actor.as_mut())
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.get(id).and_then(Actor::as_agent)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.get_mut(id).and_then(Actor::as_agent_mut)
    }

    pub fn player(&self, id: AgentId) -> Option<&PlayerCharacter> {
        self.get(id).and_then(Actor::as_player)
    }

    pub fn player_mut(&mut self, id: AgentId) -> Option<&mut PlayerCharacter> {
        self.get_mut(id).and_then(Actor::as_player_mut)
    }

    pub fn combatant(&self, id: AgentId) -> Option<&dyn Combatant> {
        self.get(id).map(Actor::as_combatant)
    }

    /// Removes the actor and retires its handle.
    pub fn despawn(&mut self, id: AgentId) -> Option<Actor> {
        let slot = self
            .slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())?;
        let actor = slot.actor.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        tracing::debug!(%id, "actor despawned");
        Some(actor)
    }

    /// Snapshot of `id`, or `None` if the handle no longer resolves.
    pub fn target_view(&self, id: AgentId) -> Option<TargetView> {
        self.combatant(id).map(TargetView::of)
    }

    /// Resolves the tracked enemy of agent `id`.
    pub fn enemy_view(&self, id: AgentId) -> Option<TargetView> {
        self.agent(id)?
            .enemy()
            .and_then(|enemy| self.target_view(enemy))
    }

    /// Clears `id` from every agent's enemy reference. Returns how many
    /// agents were tracking it.
    pub fn forget_enemy(&mut self, id: AgentId) -> usize {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.actor.as_mut()?.as_agent_mut())
            .map(|agent| agent.forget_enemy(id))
            .filter(|&forgot| forgot)
            .count()
    }

    /// Live handles in slot order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.actor
                .as_ref()
                .map(|_| AgentId::new(index as u32, slot.generation))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Actor)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.actor
                .as_ref()
                .map(|actor| (AgentId::new(index as u32, slot.generation), actor))
        })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.actor.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
