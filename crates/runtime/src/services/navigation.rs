use std::collections::BTreeMap;

use combat_core::{
    AgentId, MoveOrder, MoveRequestId, NavigationEvent, NavigationService, Position, ServiceError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Copy, Debug)]
struct ActiveMove {
    request: MoveRequestId,
    position: Position,
    destination: Position,
    /// Arrival distance, already widened for overlap stops.
    stop_distance: f32,
}

/// Straight-line locomotion over an open, square arena.
///
/// Every mover walks at the same speed towards its destination. Orders that
/// stop on overlap arrive once the mover's capsule would touch whoever stands
/// at the destination.
#[derive(Clone, Debug)]
pub struct SimNavigation {
    speed: f32,
    half_extent: f32,
    capsule_radius: f32,
    rng: StdRng,
    next_request: u64,
    moves: BTreeMap<AgentId, ActiveMove>,
}

impl SimNavigation {
    pub const DEFAULT_SPEED: f32 = 400.0;
    pub const DEFAULT_HALF_EXTENT: f32 = 3000.0;
    pub const DEFAULT_CAPSULE_RADIUS: f32 = 40.0;

    pub fn new(seed: u64) -> Self {
        Self {
            speed: Self::DEFAULT_SPEED,
            half_extent: Self::DEFAULT_HALF_EXTENT,
            capsule_radius: Self::DEFAULT_CAPSULE_RADIUS,
            rng: StdRng::seed_from_u64(seed),
            next_request: 0,
            moves: BTreeMap::new(),
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Points farther than `half_extent` from the origin along either
    /// horizontal axis are off the arena.
    pub fn with_half_extent(mut self, half_extent: f32) -> Self {
        self.half_extent = half_extent;
        self
    }

    pub fn is_moving(&self, agent: AgentId) -> bool {
        self.moves.contains_key(&agent)
    }

    fn contains(&self, point: Position) -> bool {
        point.x.abs() <= self.half_extent && point.y.abs() <= self.half_extent
    }

    fn clamp(&self, point: Position) -> Position {
        Position::new(
            point.x.clamp(-self.half_extent, self.half_extent),
            point.y.clamp(-self.half_extent, self.half_extent),
            point.z,
        )
    }
}

impl NavigationService for SimNavigation {
    fn random_point_in_radius(
        &mut self,
        origin: Position,
        radius: f32,
    ) -> Result<Position, ServiceError> {
        if radius.is_nan() || radius <= 0.0 || !self.contains(origin) {
            return Err(ServiceError::NoNavigablePoint { origin, radius });
        }
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = radius * self.rng.r#gen::<f32>().sqrt();
        let point = origin.offset_local(distance, 0.0, angle);
        Ok(self.clamp(point))
    }

    fn move_to(&mut self, order: MoveOrder) -> Result<MoveRequestId, ServiceError> {
        if !self.contains(order.destination) {
            return Err(ServiceError::Unreachable {
                agent: order.agent,
                destination: order.destination,
            });
        }

        self.next_request += 1;
        let request = MoveRequestId(self.next_request);
        let stop_distance = if order.stop_on_overlap {
            order.acceptance_radius.max(2.0 * self.capsule_radius)
        } else {
            order.acceptance_radius
        };
        let superseded = self.moves.insert(
            order.agent,
            ActiveMove {
                request,
                position: order.from,
                destination: order.destination,
                stop_distance,
            },
        );
        if let Some(previous) = superseded {
            tracing::trace!(agent = %order.agent, request = previous.request.0, "move superseded");
        }
        Ok(request)
    }

    fn stop_movement(&mut self, agent: AgentId) {
        self.moves.remove(&agent);
    }

    fn poll(&mut self, dt: f32) -> Vec<NavigationEvent> {
        let step = self.speed * dt.max(0.0);
        let mut events = Vec::new();

        self.moves.retain(|&agent, active| {
            let remaining = active.position.distance(active.destination);
            let yaw = active.position.yaw_towards(active.destination);
            let arrived = remaining - step <= active.stop_distance;

            let travel = if arrived {
                (remaining - active.stop_distance).max(0.0)
            } else {
                step
            };
            active.position = active.position.offset_local(travel, 0.0, yaw);
            events.push(NavigationEvent::Moved {
                agent,
                position: active.position,
                yaw,
            });

            if arrived {
                events.push(NavigationEvent::Completed {
                    agent,
                    request: active.request,
                    success: true,
                });
            }
            !arrived
        });
        events
    }
}
