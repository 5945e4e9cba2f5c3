//! Common error infrastructure for combat-core.
//!
//! Combat commands themselves never fail: a command issued in the wrong state is
//! a designed no-op, and a missing target only ever shows up as a zero score.
//! Errors exist at the edges instead, where configuration is validated and
//! collaborators (navigation, animation) report failures.
//!
//! Domain-specific errors (`ConfigError`, `ServiceError`) live next to the code
//! that produces them and implement [`CombatError`] for uniform classification.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the agent will retry on a later evaluation tick
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistency that needs investigation
/// - **Fatal**: the simulation cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: navigation query failed, destination unreachable
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: weight outside [0, 1], inverted cooldown range
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - simulation cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
