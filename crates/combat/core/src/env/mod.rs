//! Collaborator contracts the combat core depends on but does not implement.
//!
//! Navigation, animation, damage tracing, timers and randomness belong to the
//! host. Commands receive them through the [`Services`] bundle, which is
//! assembled per call from disjoint borrows so the host can keep the actor
//! registry borrowed at the same time.
mod animation;
mod error;
mod navigation;
mod rng;
mod trace;

pub use animation::{AnimationEvent, AnimationService, Clip, DEFAULT_SECTION};
pub use error::ServiceError;
pub use navigation::{MoveOrder, MoveRequestId, NavigationEvent, NavigationService};
pub use rng::{PcgRng, RngOracle, ScriptedRng};
pub use trace::DamageTraceService;

use crate::timer::TimerService;

/// Mutable collaborators handed to agent and player commands.
pub struct Services<'a> {
    pub navigation: &'a mut dyn NavigationService,
    pub animation: &'a mut dyn AnimationService,
    pub timers: &'a mut dyn TimerService,
    pub rng: &'a mut dyn RngOracle,
}

impl<'a> Services<'a> {
    pub fn new(
        navigation: &'a mut dyn NavigationService,
        animation: &'a mut dyn AnimationService,
        timers: &'a mut dyn TimerService,
        rng: &'a mut dyn RngOracle,
    ) -> Self {
        Self {
            navigation,
            animation,
            timers,
            rng,
        }
    }
}
