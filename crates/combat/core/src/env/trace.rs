use crate::registry::ActorRegistry;
use crate::state::AgentId;

/// Weapon sweep query.
///
/// Returns zero or one struck actor per invocation. Deduplication against the
/// attacker's per-attack hit set happens in the caller.
pub trait DamageTraceService {
    fn sweep(&mut self, attacker: AgentId, actors: &ActorRegistry) -> Option<AgentId>;
}
