//! Capability shared by every actor that can fight.

use crate::state::{AgentId, DefensiveState, Position, TeamId};

/// Read-only combat surface implemented by AI agents and the player alike.
pub trait Combatant {
    fn id(&self) -> AgentId;
    fn team(&self) -> TeamId;
    fn health(&self) -> f32;
    fn max_health(&self) -> f32;
    fn is_dead(&self) -> bool;
    /// Mid-swing; opponents may react with a block or dodge.
    fn is_attacking(&self) -> bool;
    fn defensive_state(&self) -> DefensiveState;
    fn position(&self) -> Position;

    /// `other` is alive and fights for a different team.
    fn is_enemy(&self, other: &dyn Combatant) -> bool {
        other.team() != self.team() && !other.is_dead()
    }
}

/// Snapshot of a target taken before the observer is mutably borrowed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetView {
    pub id: AgentId,
    pub team: TeamId,
    pub position: Position,
    pub is_dead: bool,
    pub is_attacking: bool,
}

impl TargetView {
    pub fn of(combatant: &dyn Combatant) -> Self {
        Self {
            id: combatant.id(),
            team: combatant.team(),
            position: combatant.position(),
            is_dead: combatant.is_dead(),
            is_attacking: combatant.is_attacking(),
        }
    }

    /// Same test as [`Combatant::is_enemy`], against a snapshot.
    #[inline]
    pub fn is_enemy_of(&self, team: TeamId) -> bool {
        self.team != team && !self.is_dead
    }
}
