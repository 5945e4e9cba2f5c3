//! In-memory implementations of the collaborator traits `combat-core`
//! depends on.
//!
//! These stand in for an engine's navigation mesh, animation graph and weapon
//! traces so a fight can run headless. They are bundled into [`Backends`],
//! which hands out [`Services`] borrows disjoint from the actor registry.
mod animation;
mod navigation;
mod rng;
mod trace;

use combat_core::{
    AnimationService, DamageTraceService, NavigationService, RngOracle, Scheduler, Services,
};

pub use animation::SimAnimation;
pub use navigation::SimNavigation;
pub use rng::StdRngOracle;
pub use trace::ReachTrace;

/// Collaborators owned by a world, plus its timer queue.
pub struct Backends {
    pub(crate) navigation: Box<dyn NavigationService>,
    pub(crate) animation: Box<dyn AnimationService>,
    pub(crate) trace: Box<dyn DamageTraceService>,
    pub(crate) timers: Scheduler,
    pub(crate) rng: Box<dyn RngOracle>,
}

impl Backends {
    pub fn new(
        navigation: Box<dyn NavigationService>,
        animation: Box<dyn AnimationService>,
        trace: Box<dyn DamageTraceService>,
        rng: Box<dyn RngOracle>,
    ) -> Self {
        Self {
            navigation,
            animation,
            trace,
            timers: Scheduler::new(),
            rng,
        }
    }

    /// Borrows the collaborators a command needs.
    pub fn services(&mut self) -> Services<'_> {
        Services::new(
            &mut *self.navigation,
            &mut *self.animation,
            &mut self.timers,
            &mut *self.rng,
        )
    }

    pub fn timers(&self) -> &Scheduler {
        &self.timers
    }
}
