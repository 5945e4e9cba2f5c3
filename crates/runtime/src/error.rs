//! Unified error types surfaced by the runtime API.
//!
//! Only host-facing lookups fail: resolving a handle that is gone, naming
//! content that was never loaded, or spawning with settings that do not
//! validate. Combat commands themselves report designed no-ops through
//! [`CommandOutcome`](combat_core::CommandOutcome) instead.
use combat_core::{AgentId, CombatError, ConfigError, ErrorSeverity};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum RuntimeError {
    #[error("actor {0} is not alive in this world")]
    UnknownAgent(AgentId),

    #[error("actor {0} is not an AI agent")]
    NotAnAgent(AgentId),

    #[error("actor {0} is not a player")]
    NotAPlayer(AgentId),

    #[error("no behaviour profile named '{0}'")]
    UnknownProfile(String),

    #[error("no archetype named '{0}'")]
    UnknownArchetype(String),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownAgent(_) | Self::NotAnAgent(_) | Self::NotAPlayer(_) => {
                ErrorSeverity::Recoverable
            }
            Self::UnknownProfile(_) | Self::UnknownArchetype(_) | Self::InvalidConfig(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAgent(_) => "RUNTIME_UNKNOWN_AGENT",
            Self::NotAnAgent(_) => "RUNTIME_NOT_AN_AGENT",
            Self::NotAPlayer(_) => "RUNTIME_NOT_A_PLAYER",
            Self::UnknownProfile(_) => "RUNTIME_UNKNOWN_PROFILE",
            Self::UnknownArchetype(_) => "RUNTIME_UNKNOWN_ARCHETYPE",
            Self::InvalidConfig(inner) => inner.error_code(),
        }
    }
}
