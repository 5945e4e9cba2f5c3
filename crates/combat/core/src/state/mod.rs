//! Plain data describing actors in a fight.
//!
//! Nothing here mutates on its own; the state machine and agent facade own the
//! transitions.
mod combat_state;
mod common;

pub use combat_state::{ActionFlags, CombatState, DefensiveState, StrafeDirection};
pub use common::{AgentId, Position, TeamId};
