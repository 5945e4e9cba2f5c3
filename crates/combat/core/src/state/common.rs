use std::fmt;

/// Non-owning handle to an actor stored in an [`crate::ActorRegistry`].
///
/// Handles are generational: once the referent is despawned its slot generation
/// advances and every outstanding handle resolves to "gone" instead of aliasing
/// whatever is spawned into the slot next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId {
    index: u32,
    generation: u32,
}

impl AgentId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the registry.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Team affiliation. Actors on different teams are enemies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TeamId(pub u8);

impl TeamId {
    /// Team reserved for the player character.
    pub const PLAYER: Self = Self(0);
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team{}", self.0)
    }
}

/// World-space position in engine units. `z` is the vertical axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Returns this position displaced by a local-frame offset rotated by `yaw`
    /// (radians) about the vertical axis.
    ///
    /// Local frame: `+forward` is the facing direction, `+right` is the facing
    /// direction advanced by a quarter turn of yaw.
    pub fn offset_local(self, forward: f32, right: f32, yaw: f32) -> Position {
        let (sin, cos) = yaw.sin_cos();
        Position {
            x: self.x + forward * cos - right * sin,
            y: self.y + forward * sin + right * cos,
            z: self.z,
        }
    }

    /// Yaw (radians) of the horizontal direction from `self` towards `target`.
    pub fn yaw_towards(self, target: Position) -> f32 {
        (target.y - self.y).atan2(target.x - self.x)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 0.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn local_offset_rotates_about_vertical_axis() {
        let origin = Position::ORIGIN;

        let ahead = origin.offset_local(10.0, 0.0, 0.0);
        assert!((ahead.x - 10.0).abs() < 1e-4 && ahead.y.abs() < 1e-4);

        // Facing +y: "right" points towards -x.
        let right = origin.offset_local(0.0, 10.0, std::f32::consts::FRAC_PI_2);
        assert!((right.x + 10.0).abs() < 1e-4 && right.y.abs() < 1e-4);
    }
}
