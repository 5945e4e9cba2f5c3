//! Single-threaded simulation host for `combat-core` actors.
//!
//! This crate wires the combat rules to a clock, a timer queue and a set of
//! collaborators, and exposes them through [`CombatWorld`]. Hosts build a
//! world, spawn actors, call [`CombatWorld::advance`] once per frame and drain
//! the recorded [`CombatEvent`]s.
//!
//! Modules are organized by responsibility:
//! - [`world`] hosts the orchestrator and builder
//! - [`services`] provides in-memory navigation, animation, trace and RNG
//! - [`events`] records what happened each frame
pub mod error;
pub mod events;
pub mod services;
pub mod world;

pub use error::{Result, RuntimeError};
pub use events::{CombatEvent, EventLog, RecordedEvent};
pub use services::{Backends, ReachTrace, SimAnimation, SimNavigation, StdRngOracle};
pub use world::{CombatWorld, CombatWorldBuilder};
