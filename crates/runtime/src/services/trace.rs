use combat_core::{Actor, ActorRegistry, AgentId, Combatant, DamageTraceService};

/// Sweep that strikes the nearest live enemy within reach of the attacker.
///
/// Agents sweep with the reach of the attack in flight, so ranged and
/// ultimate attacks connect across the ranged band. Players, and agents with
/// no attack in flight, use the fixed `reach`.
#[derive(Clone, Copy, Debug)]
pub struct ReachTrace {
    reach: f32,
}

impl ReachTrace {
    /// Default melee reach, matching the default agent attack range.
    pub const DEFAULT_REACH: f32 = 150.0;

    pub fn new(reach: f32) -> Self {
        Self { reach }
    }

    fn reach_of(&self, attacker: &Actor) -> f32 {
        match attacker {
            Actor::Ai(agent) => agent.attack_reach().unwrap_or(self.reach),
            Actor::Player(_) => self.reach,
        }
    }
}

impl Default for ReachTrace {
    fn default() -> Self {
        Self::new(Self::DEFAULT_REACH)
    }
}

impl DamageTraceService for ReachTrace {
    fn sweep(&mut self, attacker: AgentId, actors: &ActorRegistry) -> Option<AgentId> {
        let actor = actors.get(attacker)?;
        let reach = self.reach_of(actor);
        let attacker = actor.as_combatant();
        let origin = attacker.position();

        actors
            .iter()
            .map(|(_, actor)| actor.as_combatant())
            .filter(|other| attacker.is_enemy(*other))
            .map(|other| (other.id(), origin.distance(other.position())))
            .filter(|&(_, distance)| distance <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}
