use bitflags::bitflags;

/// The single action category an agent is currently executing.
///
/// Combat states are mutually exclusive: an agent must be back in
/// [`CombatState::Unoccupied`] before it may start its next action.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatState {
    /// Free to start a new action.
    #[default]
    Unoccupied,
    Seek,
    Strafe,
    Attacking,
    Blocking,
    Dodging,
    Patrol,
    Stunned,
    /// Terminal. No transition leaves this state.
    Dead,
}

impl CombatState {
    /// Returns true for states that represent an action in flight.
    #[inline]
    pub const fn is_occupied(self) -> bool {
        !matches!(self, Self::Unoccupied | Self::Dead)
    }

    #[inline]
    pub const fn is_dead(self) -> bool {
        matches!(self, Self::Dead)
    }
}

bitflags! {
    /// Transient sub-flags raised while an action plays out.
    ///
    /// Cleared together whenever the agent is released back to `Unoccupied`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ActionFlags: u8 {
        const ATTACKING = 1 << 0;
        const BLOCKING = 1 << 1;
        const DODGING = 1 << 2;
    }
}

/// Lateral direction held by an agent while it circles its enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StrafeDirection {
    /// No direction chosen yet; one is rolled on the next strafe.
    #[default]
    None,
    Back,
    Left,
    Right,
}

impl StrafeDirection {
    /// Directions a strafe may roll, in roll order.
    pub const CHOICES: [StrafeDirection; 3] = [Self::Back, Self::Left, Self::Right];

    /// Local-frame `(forward, right)` displacement for a strafe of `distance`.
    pub fn local_offset(self, distance: f32) -> (f32, f32) {
        match self {
            Self::None => (0.0, 0.0),
            Self::Back => (-distance, 0.0),
            Self::Left => (0.0, -distance),
            Self::Right => (0.0, distance),
        }
    }
}

/// Defensive posture that modifies incoming non-lethal damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DefensiveState {
    #[default]
    None,
    /// Incoming non-lethal damage is halved.
    Blocking,
    /// Incoming non-lethal damage is fully negated.
    Dodging,
}

impl DefensiveState {
    /// Multiplier applied to non-lethal damage.
    pub const fn damage_multiplier(self) -> f32 {
        match self {
            Self::None => 1.0,
            Self::Blocking => 0.5,
            Self::Dodging => 0.0,
        }
    }
}
