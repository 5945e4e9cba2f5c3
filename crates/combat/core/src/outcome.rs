//! Results of combat commands.
//!
//! Commands never fail in the error-handling sense. A command issued in the
//! wrong state is a designed no-op reported as [`CommandOutcome::Ignored`];
//! a collaborator failure is reported as [`CommandOutcome::Failed`] after the
//! actor has already released itself.

use crate::env::ServiceError;
use crate::state::CombatState;

/// What a command did.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub enum CommandOutcome {
    /// The command ran and the actor entered (and possibly already left) its
    /// action state.
    Executed,
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// The command started but a collaborator refused it; the actor was
    /// released immediately.
    Failed(ServiceError),
}

impl CommandOutcome {
    #[inline]
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }

    #[inline]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// Why a command was a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum IgnoreReason {
    Dead,
    /// Another action is in flight.
    Busy(CombatState),
    /// No live enemy reference to act on.
    NoTarget,
    /// The enemy is outside melee reach.
    OutOfRange,
    NotAggressive,
    CannotPatrol,
    /// Patrol is suppressed while an enemy is detected.
    EnemyDetected,
}

/// What an incoming hit did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    /// Non-lethal hit after defensive mitigation.
    Applied { amount: f32, remaining: f32 },
    /// The hit was lethal; the actor is now dead.
    Killed,
    /// The actor was already dead.
    Ignored,
}
