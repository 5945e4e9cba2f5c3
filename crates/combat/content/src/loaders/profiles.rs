//! Behaviour profile loader.

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::CombatBehaviorProfile;

use crate::loaders::{LoadResult, read_file};

/// Loader for behaviour profiles from RON files.
pub struct ProfileLoader;

impl ProfileLoader {
    /// Load profiles from a RON file.
    ///
    /// RON format: `{ "name": (attack: f32, block: f32, dodge: f32,
    /// ranged_attack: f32, ultimate_attack: f32) }`
    ///
    /// Every weight must lie in `[0, 1]`.
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, CombatBehaviorProfile>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid profiles file {}: {}", path.display(), e))
    }

    /// Parse and validate profiles from RON text.
    pub fn parse(content: &str) -> LoadResult<BTreeMap<String, CombatBehaviorProfile>> {
        let profiles: BTreeMap<String, CombatBehaviorProfile> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse profiles RON: {}", e))?;

        for (name, profile) in &profiles {
            profile
                .validate()
                .map_err(|e| anyhow::anyhow!("Profile '{}': {}", name, e))?;
        }

        tracing::debug!(count = profiles.len(), "profiles loaded");
        Ok(profiles)
    }
}
