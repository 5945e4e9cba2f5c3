//! Fire-once timers driven by the simulation clock.
//!
//! Timers are plain data: a [`TimerTask`] describes what should happen when
//! the timer fires and the owner of the [`Scheduler`] routes it. Nothing holds
//! a callback into an agent, so a despawned agent can never be touched by a
//! stale timer; cancelled tokens are simply skipped on pop.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::state::AgentId;

/// Handle returned by [`TimerService::schedule`], used to cancel the timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Abilities gated by a sampled cooldown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Cooldown {
    Strafe,
    Block,
    Dodge,
}

/// Work item delivered when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTask {
    /// The cooldown elapsed; the ability becomes available again.
    CooldownExpired { agent: AgentId, cooldown: Cooldown },
    /// Periodic utility evaluation for an agent.
    Evaluate { agent: AgentId },
    /// No completion signal arrived for the action in flight.
    ActionTimeout { agent: AgentId },
}

impl TimerTask {
    pub const fn agent(&self) -> AgentId {
        match *self {
            Self::CooldownExpired { agent, .. }
            | Self::Evaluate { agent }
            | Self::ActionTimeout { agent } => agent,
        }
    }
}

/// Scheduling capability handed to agent commands.
pub trait TimerService {
    /// Arms a fire-once timer `delay` seconds from now.
    fn schedule(&mut self, delay: f32, task: TimerTask) -> TimerToken;

    /// Cancels a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    fn cancel(&mut self, token: TimerToken) -> bool;
}

#[derive(Clone, Debug)]
struct Entry {
    fire_at: f64,
    token: TimerToken,
    task: TimerTask,
}

// Min-heap on (fire_at, token): BinaryHeap is a max-heap so the order is
// reversed. Token order breaks ties in scheduling order.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.token.cmp(&self.token))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Priority queue of `(fire time, task)` keyed by cancellation token.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: f64,
    next_token: u64,
    queue: BinaryHeap<Entry>,
    pending: HashSet<TimerToken>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.contains(&token)
    }

    /// Number of live (not cancelled, not fired) timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pops the earliest live timer due at or before `until`.
    ///
    /// The clock is moved to the fire time of the popped timer so that
    /// anything scheduled while handling it is measured from the right
    /// instant. Call [`Self::advance_to`] once nothing else is due.
    pub fn pop_due(&mut self, until: f64) -> Option<(TimerToken, TimerTask)> {
        while let Some(head) = self.queue.peek() {
            if head.fire_at > until {
                return None;
            }
            let entry = self.queue.pop()?;
            if self.pending.remove(&entry.token) {
                self.now = self.now.max(entry.fire_at);
                return Some((entry.token, entry.task));
            }
        }
        None
    }

    /// Moves the clock forward. Never moves it backwards.
    pub fn advance_to(&mut self, time: f64) {
        self.now = self.now.max(time);
    }

    /// Cancels every pending timer that targets `agent`.
    pub fn cancel_agent(&mut self, agent: AgentId) -> usize {
        let before = self.pending.len();
        let doomed: Vec<TimerToken> = self
            .queue
            .iter()
            .filter(|entry| entry.task.agent() == agent)
            .map(|entry| entry.token)
            .collect();
        for token in doomed {
            self.pending.remove(&token);
        }
        before - self.pending.len()
    }
}

impl TimerService for Scheduler {
    fn schedule(&mut self, delay: f32, task: TimerTask) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;

        let fire_at = self.now + f64::from(delay.max(0.0));
        tracing::trace!(token = token.raw(), fire_at, ?task, "timer scheduled");

        self.pending.insert(token);
        self.queue.push(Entry {
            fire_at,
            token,
            task,
        });
        token
    }

    fn cancel(&mut self, token: TimerToken) -> bool {
        self.pending.remove(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(index: u32) -> AgentId {
        AgentId::new(index, 0)
    }

    #[test]
    fn fires_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2.0, TimerTask::Evaluate { agent: agent(1) });
        scheduler.schedule(1.0, TimerTask::Evaluate { agent: agent(2) });

        assert_eq!(scheduler.pop_due(0.5), None);
        let (_, first) = scheduler.pop_due(3.0).unwrap();
        assert_eq!(first.agent(), agent(2));
        assert_eq!(scheduler.now(), 1.0);
        let (_, second) = scheduler.pop_due(3.0).unwrap();
        assert_eq!(second.agent(), agent(1));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(1.0, TimerTask::ActionTimeout { agent: agent(1) });
        let b = scheduler.schedule(1.0, TimerTask::ActionTimeout { agent: agent(2) });

        assert_eq!(scheduler.pop_due(1.0).map(|(t, _)| t), Some(a));
        assert_eq!(scheduler.pop_due(1.0).map(|(t, _)| t), Some(b));
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(1.0, TimerTask::Evaluate { agent: agent(1) });

        assert!(scheduler.cancel(token));
        assert!(!scheduler.cancel(token));
        assert_eq!(scheduler.pop_due(10.0), None);
    }

    #[test]
    fn delays_are_measured_from_the_current_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(5.0);
        scheduler.schedule(1.0, TimerTask::Evaluate { agent: agent(1) });

        assert_eq!(scheduler.pop_due(5.5), None);
        assert!(scheduler.pop_due(6.0).is_some());
    }

    #[test]
    fn cancel_agent_drops_only_that_agents_timers() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(
            1.0,
            TimerTask::CooldownExpired {
                agent: agent(1),
                cooldown: Cooldown::Block,
            },
        );
        scheduler.schedule(2.0, TimerTask::Evaluate { agent: agent(1) });
        scheduler.schedule(3.0, TimerTask::Evaluate { agent: agent(2) });

        assert_eq!(scheduler.cancel_agent(agent(1)), 2);
        let (_, task) = scheduler.pop_due(10.0).unwrap();
        assert_eq!(task.agent(), agent(2));
    }
}
