//! Archetype loader.
//!
//! An archetype pairs a behaviour profile name with the per-instance settings
//! of the agents spawned from it. Settings not listed keep their defaults.

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::AgentConfig;
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// One `[archetypes.<name>]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ArchetypeSpec {
    /// Key into the profile catalog.
    pub profile: String,
    #[serde(flatten)]
    pub config: AgentConfig,
}

#[derive(Deserialize)]
struct ArchetypesFile {
    #[serde(default)]
    archetypes: BTreeMap<String, ArchetypeSpec>,
}

/// Loader for archetypes from TOML files.
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    /// Load archetypes from a TOML file.
    ///
    /// ```toml
    /// [archetypes.grunt]
    /// profile = "brawler"
    /// max_health = 80.0
    /// strafe_cooldown = { min = 6.0, max = 9.0 }
    /// ```
    ///
    /// Profile names are not resolved here; see
    /// [`ContentRegistry`](crate::ContentRegistry).
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, ArchetypeSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid archetypes file {}: {}", path.display(), e))
    }

    /// Parse and validate archetypes from TOML text.
    pub fn parse(content: &str) -> LoadResult<BTreeMap<String, ArchetypeSpec>> {
        let file: ArchetypesFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse archetypes TOML: {}", e))?;

        for (name, spec) in &file.archetypes {
            spec.config
                .validate()
                .map_err(|e| anyhow::anyhow!("Archetype '{}': {}", name, e))?;
        }

        tracing::debug!(count = file.archetypes.len(), "archetypes loaded");
        Ok(file.archetypes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CooldownRange, TeamId};

    #[test]
    fn unlisted_settings_keep_defaults() {
        let archetypes = ArchetypeLoader::parse(
            r#"
            [archetypes.grunt]
            profile = "brawler"
            max_health = 80.0
            team = 2
            strafe_cooldown = { min = 6.0, max = 9.0 }
            "#,
        )
        .unwrap();

        let grunt = &archetypes["grunt"];
        assert_eq!(grunt.profile, "brawler");
        assert_eq!(grunt.config.max_health, 80.0);
        assert_eq!(grunt.config.team, TeamId(2));
        assert_eq!(grunt.config.strafe_cooldown, CooldownRange::new(6.0, 9.0));
        assert_eq!(
            grunt.config.attack_range,
            AgentConfig::DEFAULT_ATTACK_RANGE
        );
    }

    #[test]
    fn empty_file_has_no_archetypes() {
        assert!(ArchetypeLoader::parse("").unwrap().is_empty());
    }

    #[test]
    fn inverted_cooldown_is_rejected() {
        let err = ArchetypeLoader::parse(
            r#"
            [archetypes.broken]
            profile = "brawler"
            block_cooldown = { min = 6.0, max = 4.0 }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'broken'"), "{err}");
    }

    #[test]
    fn missing_profile_key_is_a_parse_error() {
        assert!(ArchetypeLoader::parse("[archetypes.nameless]\nmax_health = 10.0\n").is_err());
    }
}
