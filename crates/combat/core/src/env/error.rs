//! Collaborator failures.

use crate::error::{CombatError, ErrorSeverity};
use crate::state::{AgentId, Position};

/// Failures reported by navigation and animation collaborators.
///
/// These never abort a command: the agent logs the failure and releases
/// itself so it cannot get stuck in an occupied state.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// No navigable point could be found around the origin.
    #[error("no navigable point within {radius} of {origin}")]
    NoNavigablePoint { origin: Position, radius: f32 },

    /// The destination cannot be reached from the agent's position.
    #[error("destination {destination} is unreachable for {agent}")]
    Unreachable {
        agent: AgentId,
        destination: Position,
    },

    /// The animation asset or section is missing.
    #[error("animation clip {clip}/{section} is missing")]
    MissingClip {
        clip: &'static str,
        section: &'static str,
    },

    /// The collaborator does not know about this actor.
    #[error("actor {0} is not registered with the collaborator")]
    UnknownActor(AgentId),
}

impl CombatError for ServiceError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoNavigablePoint { .. } | Self::Unreachable { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::MissingClip { .. } => ErrorSeverity::Validation,
            Self::UnknownActor(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoNavigablePoint { .. } => "SERVICE_NO_NAVIGABLE_POINT",
            Self::Unreachable { .. } => "SERVICE_UNREACHABLE",
            Self::MissingClip { .. } => "SERVICE_MISSING_CLIP",
            Self::UnknownActor(_) => "SERVICE_UNKNOWN_ACTOR",
        }
    }
}
