//! Presentation collaborator contract.

use super::ServiceError;
use crate::state::AgentId;

/// Animation assets an actor can play segments from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Clip {
    Attack,
    RangedAttack,
    Ultimate,
    Block,
    Dodge,
    Death,
}

/// Section played for clips that only have one.
pub const DEFAULT_SECTION: &str = "Default";

/// Notifications raised while a segment plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    /// The swing reached the frames where the weapon can connect.
    HitWindow { agent: AgentId },
    /// The segment finished; the owner should be released.
    Finished { agent: AgentId },
}

/// Animation playback, owned by the host engine.
pub trait AnimationService {
    /// Plays `section` of `clip` on `agent`, interrupting whatever was playing.
    fn play_segment(
        &mut self,
        agent: AgentId,
        clip: Clip,
        section: &'static str,
    ) -> Result<(), ServiceError>;

    /// Stops every segment on `agent`, blending out over `blend_out` seconds.
    fn stop_all(&mut self, agent: AgentId, blend_out: f32);

    /// Pauses the pose of `agent` in place.
    fn freeze(&mut self, agent: AgentId);

    /// Advances playback by `dt` seconds and drains notifications.
    fn poll(&mut self, _dt: f32) -> Vec<AnimationEvent> {
        Vec::new()
    }
}
