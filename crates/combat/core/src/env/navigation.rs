//! Navigation collaborator contract.

use super::ServiceError;
use crate::state::{AgentId, Position};

/// Handle for an issued move order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveRequestId(pub u64);

/// A single move-to-location order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOrder {
    pub agent: AgentId,
    pub from: Position,
    pub destination: Position,
    /// Distance from `destination` at which the move counts as arrived.
    pub acceptance_radius: f32,
    /// Stop early when the mover overlaps another actor.
    pub stop_on_overlap: bool,
}

/// Progress reported back by a navigation collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NavigationEvent {
    /// The mover advanced to `position`, facing `yaw`.
    Moved {
        agent: AgentId,
        position: Position,
        yaw: f32,
    },
    /// The move order finished, successfully or not.
    Completed {
        agent: AgentId,
        request: MoveRequestId,
        success: bool,
    },
}

/// Pathfinding and locomotion, owned by the host engine.
pub trait NavigationService {
    /// Random reachable point within `radius` of `origin`.
    fn random_point_in_radius(
        &mut self,
        origin: Position,
        radius: f32,
    ) -> Result<Position, ServiceError>;

    /// Starts moving `order.agent` towards `order.destination`.
    ///
    /// Completion is reported asynchronously, either through [`Self::poll`]
    /// or by the host calling back into the world directly.
    fn move_to(&mut self, order: MoveOrder) -> Result<MoveRequestId, ServiceError>;

    /// Aborts any move in progress for `agent`. No completion is reported.
    fn stop_movement(&mut self, agent: AgentId);

    /// Advances locomotion by `dt` seconds and drains progress reports.
    fn poll(&mut self, _dt: f32) -> Vec<NavigationEvent> {
        Vec::new()
    }
}
