//! Resolved content catalog.

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::{AgentConfig, CombatBehaviorProfile};

use crate::loaders::{ArchetypeLoader, ArchetypeSpec, LoadResult, ProfileLoader};

const BUILTIN_PROFILES: &str = include_str!("../data/profiles.ron");
const BUILTIN_ARCHETYPES: &str = include_str!("../data/archetypes.toml");

/// An archetype with its profile name resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Archetype {
    pub profile_name: String,
    pub profile: CombatBehaviorProfile,
    pub config: AgentConfig,
}

/// Profiles and archetypes loaded from one content directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── profiles.ron
/// └── archetypes.toml
/// ```
#[derive(Clone, Debug, Default)]
pub struct ContentRegistry {
    profiles: BTreeMap<String, CombatBehaviorProfile>,
    archetypes: BTreeMap<String, Archetype>,
}

impl ContentRegistry {
    /// Loads every content file under `data_dir`.
    ///
    /// Fails if a file is missing or malformed, or if an archetype names a
    /// profile that does not exist.
    pub fn load(data_dir: &Path) -> LoadResult<Self> {
        let profiles = ProfileLoader::load(&data_dir.join("profiles.ron"))?;
        let archetypes = ArchetypeLoader::load(&data_dir.join("archetypes.toml"))?;
        let registry = Self::resolve(profiles, archetypes)?;
        tracing::info!(
            dir = %data_dir.display(),
            profiles = registry.profiles.len(),
            archetypes = registry.archetypes.len(),
            "content loaded"
        );
        Ok(registry)
    }

    /// The content pack compiled into this crate.
    pub fn builtin() -> LoadResult<Self> {
        let profiles = ProfileLoader::parse(BUILTIN_PROFILES)?;
        let archetypes = ArchetypeLoader::parse(BUILTIN_ARCHETYPES)?;
        Self::resolve(profiles, archetypes)
    }

    fn resolve(
        profiles: BTreeMap<String, CombatBehaviorProfile>,
        specs: BTreeMap<String, ArchetypeSpec>,
    ) -> LoadResult<Self> {
        let mut archetypes = BTreeMap::new();
        for (name, spec) in specs {
            let profile = *profiles.get(&spec.profile).ok_or_else(|| {
                anyhow::anyhow!(
                    "Archetype '{}' references unknown profile '{}'",
                    name,
                    spec.profile
                )
            })?;
            archetypes.insert(
                name,
                Archetype {
                    profile_name: spec.profile,
                    profile,
                    config: spec.config,
                },
            );
        }
        Ok(Self {
            profiles,
            archetypes,
        })
    }

    pub fn profile(&self, name: &str) -> Option<&CombatBehaviorProfile> {
        self.profiles.get(name)
    }

    pub fn archetype(&self, name: &str) -> Option<&Archetype> {
        self.archetypes.get(name)
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn archetype_names(&self) -> impl Iterator<Item = &str> {
        self.archetypes.keys().map(String::as_str)
    }
}
