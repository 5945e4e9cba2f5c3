//! Per-agent tunables.
//!
//! Every numeric knob that the reference behaviour hard-codes lives here with
//! its reference value as the default, so archetype files only need to list
//! what differs.

use crate::error::{CombatError, ErrorSeverity};
use crate::state::TeamId;

/// Errors raised while validating configuration data.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must lie in [0, 1], got {value}")]
    WeightOutOfRange { field: &'static str, value: f32 },

    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
}

impl CombatError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WeightOutOfRange { .. } => "CONFIG_WEIGHT_OUT_OF_RANGE",
            Self::InvertedRange { .. } => "CONFIG_INVERTED_RANGE",
            Self::Negative { .. } => "CONFIG_NEGATIVE",
            Self::NotPositive { .. } => "CONFIG_NOT_POSITIVE",
        }
    }
}

/// Closed interval of seconds that a duration is sampled from uniformly.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownRange {
    pub min: f32,
    pub max: f32,
}

impl CooldownRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range that always yields `secs`.
    pub const fn fixed(secs: f32) -> Self {
        Self::new(secs, secs)
    }

    /// Maps a unit sample `t ∈ [0, 1)` into the range.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min < 0.0 {
            return Err(ConfigError::Negative {
                field,
                value: self.min,
            });
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Per-instance combat settings for an AI agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    pub max_health: f32,
    pub team: TeamId,

    /// Melee reach. Enemies at or inside this distance are "in attack range".
    pub attack_range: f32,
    /// Outer edge of the ranged band `(attack_range, ranged_attack_range]`.
    pub ranged_attack_range: f32,
    /// Only aggressive agents close the distance on their own.
    pub aggressive: bool,

    pub can_patrol: bool,
    pub patrol_radius: f32,

    pub strafe_cooldown: CooldownRange,
    pub block_cooldown: CooldownRange,
    pub dodge_cooldown: CooldownRange,

    /// Period between utility evaluations.
    pub evaluation_period: CooldownRange,
    /// Skip scoring entirely while no enemy is detected.
    pub evaluate_only_when_enemy_detected: bool,

    /// Lateral displacement of a single strafe move.
    pub strafe_offset: f32,
    /// Acceptance radius passed along with every move order.
    pub acceptance_radius: f32,

    /// Damage dealt to each enemy struck during one attack.
    pub melee_damage: f32,
    /// Seconds after which an action with no completion signal is released.
    pub action_timeout: f32,
    /// Blend-out used when death interrupts whatever is playing.
    pub death_blend_out: f32,
}

impl AgentConfig {
    // ===== reference values =====
    pub const DEFAULT_MAX_HEALTH: f32 = 100.0;
    pub const DEFAULT_TEAM: TeamId = TeamId(1);
    pub const DEFAULT_ATTACK_RANGE: f32 = 150.0;
    pub const DEFAULT_RANGED_ATTACK_RANGE: f32 = 600.0;
    pub const DEFAULT_PATROL_RADIUS: f32 = 1000.0;
    pub const DEFAULT_STRAFE_COOLDOWN: CooldownRange = CooldownRange::new(8.0, 12.0);
    pub const DEFAULT_BLOCK_COOLDOWN: CooldownRange = CooldownRange::new(4.0, 6.0);
    pub const DEFAULT_DODGE_COOLDOWN: CooldownRange = CooldownRange::new(4.0, 6.0);
    pub const DEFAULT_EVALUATION_PERIOD: CooldownRange = CooldownRange::new(0.5, 2.0);
    pub const DEFAULT_STRAFE_OFFSET: f32 = 300.0;
    pub const DEFAULT_ACCEPTANCE_RADIUS: f32 = 5.0;
    pub const DEFAULT_MELEE_DAMAGE: f32 = 20.0;
    pub const DEFAULT_ACTION_TIMEOUT: f32 = 3.0;
    pub const DEFAULT_DEATH_BLEND_OUT: f32 = 0.1;

    pub fn new() -> Self {
        Self {
            max_health: Self::DEFAULT_MAX_HEALTH,
            team: Self::DEFAULT_TEAM,
            attack_range: Self::DEFAULT_ATTACK_RANGE,
            ranged_attack_range: Self::DEFAULT_RANGED_ATTACK_RANGE,
            aggressive: true,
            can_patrol: false,
            patrol_radius: Self::DEFAULT_PATROL_RADIUS,
            strafe_cooldown: Self::DEFAULT_STRAFE_COOLDOWN,
            block_cooldown: Self::DEFAULT_BLOCK_COOLDOWN,
            dodge_cooldown: Self::DEFAULT_DODGE_COOLDOWN,
            evaluation_period: Self::DEFAULT_EVALUATION_PERIOD,
            evaluate_only_when_enemy_detected: false,
            strafe_offset: Self::DEFAULT_STRAFE_OFFSET,
            acceptance_radius: Self::DEFAULT_ACCEPTANCE_RADIUS,
            melee_damage: Self::DEFAULT_MELEE_DAMAGE,
            action_timeout: Self::DEFAULT_ACTION_TIMEOUT,
            death_blend_out: Self::DEFAULT_DEATH_BLEND_OUT,
        }
    }

    pub fn with_team(mut self, team: TeamId) -> Self {
        self.team = team;
        self
    }

    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self
    }

    pub fn with_ranges(mut self, attack_range: f32, ranged_attack_range: f32) -> Self {
        self.attack_range = attack_range;
        self.ranged_attack_range = ranged_attack_range;
        self
    }

    /// Checks every field for values the simulation cannot work with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_health", self.max_health)?;
        non_negative("attack_range", self.attack_range)?;
        if self.attack_range > self.ranged_attack_range {
            return Err(ConfigError::InvertedRange {
                field: "attack_range/ranged_attack_range",
                min: self.attack_range,
                max: self.ranged_attack_range,
            });
        }
        non_negative("patrol_radius", self.patrol_radius)?;
        self.strafe_cooldown.validate("strafe_cooldown")?;
        self.block_cooldown.validate("block_cooldown")?;
        self.dodge_cooldown.validate("dodge_cooldown")?;
        self.evaluation_period.validate("evaluation_period")?;
        positive("evaluation_period.min", self.evaluation_period.min)?;
        non_negative("strafe_offset", self.strafe_offset)?;
        non_negative("acceptance_radius", self.acceptance_radius)?;
        non_negative("melee_damage", self.melee_damage)?;
        positive("action_timeout", self.action_timeout)?;
        non_negative("death_blend_out", self.death_blend_out)?;
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
