//! Arena settings read from the environment.
use std::env;
use std::path::PathBuf;

/// Headless arena configuration.
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    pub seed: u64,
    pub duration_secs: f32,
    pub tick_hz: u32,
    /// Content directory; the built-in pack is used when unset.
    pub content_dir: Option<PathBuf>,
    /// Directory for a per-session log file; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            duration_secs: 60.0,
            tick_hz: 30,
            content_dir: None,
            log_dir: None,
        }
    }
}

impl ArenaConfig {
    /// Construct arena configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_SEED` - Random seed (default: 7)
    /// - `ARENA_DURATION_SECS` - Simulated seconds to run (default: 60)
    /// - `ARENA_TICK_HZ` - Frames per simulated second (default: 30)
    /// - `ARENA_CONTENT_DIR` - Directory holding `profiles.ron` and `archetypes.toml`
    /// - `ARENA_LOG_DIR` - Directory for the session log file
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("ARENA_SEED") {
            config.seed = seed;
        }
        if let Some(secs) = read_env::<f32>("ARENA_DURATION_SECS") {
            config.duration_secs = secs.max(0.0);
        }
        if let Some(hz) = read_env::<u32>("ARENA_TICK_HZ") {
            config.tick_hz = hz.max(1);
        }
        config.content_dir = env::var_os("ARENA_CONTENT_DIR").map(PathBuf::from);
        config.log_dir = env::var_os("ARENA_LOG_DIR").map(PathBuf::from);

        config
    }

    /// Seconds per frame.
    pub fn frame(&self) -> f32 {
        1.0 / self.tick_hz as f32
    }

    pub fn frames(&self) -> u64 {
        (self.duration_secs * self.tick_hz as f32).ceil() as u64
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
