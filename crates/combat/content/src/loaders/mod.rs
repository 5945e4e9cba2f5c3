//! Content loaders for reading combat data from files.

pub mod archetypes;
pub mod profiles;

pub use archetypes::{ArchetypeLoader, ArchetypeSpec};
pub use profiles::ProfileLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Load the profile catalog at `path`. See [`ProfileLoader::load`].
pub fn load_profiles(
    path: &Path,
) -> LoadResult<std::collections::BTreeMap<String, combat_core::CombatBehaviorProfile>> {
    ProfileLoader::load(path)
}

/// Load the archetype table at `path`. See [`ArchetypeLoader::load`].
pub fn load_archetypes(
    path: &Path,
) -> LoadResult<std::collections::BTreeMap<String, ArchetypeSpec>> {
    ArchetypeLoader::load(path)
}
