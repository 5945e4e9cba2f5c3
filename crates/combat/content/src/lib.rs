//! Data-driven combat content.
//!
//! This crate turns RON/TOML data files into the values `combat-core` works
//! with:
//! - behaviour profiles (`profiles.ron`), keyed by profile name
//! - archetypes (`archetypes.toml`): a profile name plus per-instance
//!   [`AgentConfig`](combat_core::AgentConfig) overrides
//!
//! A built-in pack ships with the crate, see [`ContentRegistry::builtin`].
//! Content is read once at startup and never appears in agent state.

pub mod loaders;
pub mod registry;

pub use loaders::{
    ArchetypeLoader, ArchetypeSpec, LoadResult, ProfileLoader, load_archetypes, load_profiles,
};
pub use registry::{Archetype, ContentRegistry};
