//! Real-time melee combat decision engine.
//!
//! `combat-core` holds the rules that decide what an AI combatant does each
//! evaluation tick and that keep its actions mutually exclusive:
//!
//! - [`CombatStateMachine`] guards entry into every action state
//! - [`AbilityScorer`] turns agent facts and an archetype profile into one
//!   utility score per [`Ability`]
//! - [`ActionSelector`] picks an ability by prioritized dithering
//! - [`Agent`] and [`PlayerCharacter`] own per-actor state and expose the
//!   commands the selector (or player input) dispatches
//! - [`ActorRegistry`] stores actors behind generational weak handles
//! - [`Scheduler`] drives fire-once cooldown, evaluation and timeout timers
//!
//! Everything engine-specific (navigation, animation, weapon traces) is a
//! collaborator trait in [`env`]. The crate performs no I/O and owns no clock.
pub mod agent;
pub mod combatant;
pub mod config;
pub mod env;
pub mod error;
pub mod fsm;
pub mod outcome;
pub mod player;
pub mod profile;
pub mod registry;
pub mod scoring;
pub mod selector;
pub mod state;
pub mod timer;

pub use agent::{Agent, Evaluation, MIN_EVALUATION_DELAY, Perception};
pub use combatant::{Combatant, TargetView};
pub use config::{AgentConfig, ConfigError, CooldownRange};
pub use env::{
    AnimationEvent, AnimationService, Clip, DamageTraceService, MoveOrder, MoveRequestId,
    NavigationEvent, NavigationService, PcgRng, RngOracle, ScriptedRng, ServiceError, Services,
};
pub use error::{CombatError, ErrorSeverity};
pub use fsm::{CombatStateMachine, Release, Transition};
pub use outcome::{CommandOutcome, DamageOutcome, IgnoreReason};
pub use player::{MovementInput, PlayerCharacter};
pub use profile::CombatBehaviorProfile;
pub use registry::{Actor, ActorRegistry};
pub use scoring::{Ability, AbilityScorer, AbilityScores, Score, ScoringFacts, score_ability};
pub use selector::ActionSelector;
pub use state::{
    ActionFlags, AgentId, CombatState, DefensiveState, Position, StrafeDirection, TeamId,
};
pub use timer::{Cooldown, Scheduler, TimerService, TimerTask, TimerToken};
