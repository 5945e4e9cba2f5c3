//! AI-controlled combat agent.
//!
//! The agent owns its health, ranges, cooldown timers and a weak reference to
//! its enemy. It exposes the queries the scorer reads ([`Agent::scoring_facts`])
//! and the commands the selector dispatches. Every command goes through the
//! [`CombatStateMachine`] guard first, so at most one action is ever in flight.
//!
//! Commands that touch the enemy take a [`TargetView`] snapshot rather than a
//! reference into the registry: the caller resolves the weak handle, and a
//! handle that no longer resolves is simply passed as `None`.
mod commands;
mod damage;
mod evaluation;
mod perception;

pub(crate) use damage::DEATH_SECTIONS;
pub use evaluation::Evaluation;
pub use perception::Perception;

use std::collections::HashSet;

use crate::combatant::Combatant;
use crate::config::AgentConfig;
use crate::env::{Clip, MoveRequestId, Services};
use crate::fsm::CombatStateMachine;
use crate::profile::CombatBehaviorProfile;
use crate::scoring::ScoringFacts;
use crate::state::{
    ActionFlags, AgentId, CombatState, DefensiveState, Position, StrafeDirection, TeamId,
};
use crate::timer::{Cooldown, TimerTask, TimerToken};

/// Floor on the evaluation re-arm delay, so a zero-length roll can never
/// schedule an evaluation at the instant it fires.
pub const MIN_EVALUATION_DELAY: f32 = 1.0 / 60.0;

/// Pending cooldown timers. An ability is available iff its slot is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cooldowns {
    strafe: Option<TimerToken>,
    block: Option<TimerToken>,
    dodge: Option<TimerToken>,
}

impl Cooldowns {
    fn slot_mut(&mut self, cooldown: Cooldown) -> &mut Option<TimerToken> {
        match cooldown {
            Cooldown::Strafe => &mut self.strafe,
            Cooldown::Block => &mut self.block,
            Cooldown::Dodge => &mut self.dodge,
        }
    }

    fn slot(&self, cooldown: Cooldown) -> Option<TimerToken> {
        match cooldown {
            Cooldown::Strafe => self.strafe,
            Cooldown::Block => self.block,
            Cooldown::Dodge => self.dodge,
        }
    }

    fn is_ready(&self, cooldown: Cooldown) -> bool {
        self.slot(cooldown).is_none()
    }
}

#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,
    config: AgentConfig,
    profile: CombatBehaviorProfile,

    health: f32,
    position: Position,
    /// Facing, radians about the vertical axis.
    yaw: f32,

    fsm: CombatStateMachine,

    enemy: Option<AgentId>,
    enemy_detected: bool,
    in_attack_range: bool,
    in_ranged_range: bool,
    enemy_attacking: bool,

    cooldowns: Cooldowns,
    strafe_direction: StrafeDirection,
    /// Actors struck by the attack in flight.
    already_damaged: HashSet<AgentId>,
    /// Clip of the attack in flight.
    attack_clip: Option<Clip>,

    action_timeout: Option<TimerToken>,
    evaluation: Option<TimerToken>,
    pending_move: Option<MoveRequestId>,
}

impl Agent {
    /// Creates a live, unoccupied agent at full health.
    pub fn new(
        id: AgentId,
        config: AgentConfig,
        profile: CombatBehaviorProfile,
        position: Position,
    ) -> Self {
        Self {
            id,
            health: config.max_health,
            config,
            profile,
            position,
            yaw: 0.0,
            fsm: CombatStateMachine::new(),
            enemy: None,
            enemy_detected: false,
            in_attack_range: false,
            in_ranged_range: false,
            enemy_attacking: false,
            cooldowns: Cooldowns::default(),
            strafe_direction: StrafeDirection::None,
            already_damaged: HashSet::new(),
            attack_clip: None,
            action_timeout: None,
            evaluation: None,
            pending_move: None,
        }
    }

    // ===== queries =====

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn profile(&self) -> &CombatBehaviorProfile {
        &self.profile
    }

    #[inline]
    pub fn state(&self) -> CombatState {
        self.fsm.state()
    }

    #[inline]
    pub fn combo_index(&self) -> u8 {
        self.fsm.combo_index()
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Weak handle to the tracked enemy, if any.
    pub fn enemy(&self) -> Option<AgentId> {
        self.enemy
    }

    pub fn enemy_detected(&self) -> bool {
        self.enemy_detected
    }

    pub fn in_attack_range(&self) -> bool {
        self.in_attack_range
    }

    pub fn in_ranged_range(&self) -> bool {
        self.in_ranged_range
    }

    pub fn can_strafe(&self) -> bool {
        self.cooldowns.is_ready(Cooldown::Strafe)
    }

    pub fn can_block(&self) -> bool {
        self.cooldowns.is_ready(Cooldown::Block)
    }

    pub fn can_dodge(&self) -> bool {
        self.cooldowns.is_ready(Cooldown::Dodge)
    }

    pub fn strafe_direction(&self) -> StrafeDirection {
        self.strafe_direction
    }

    /// Pending timer for `cooldown`, if the ability is locked out.
    pub fn cooldown_timer(&self, cooldown: Cooldown) -> Option<TimerToken> {
        self.cooldowns.slot(cooldown)
    }

    /// Sweep reach of the attack in flight: the melee range for combo
    /// swings, the ranged-attack range for ranged and ultimate attacks.
    pub fn attack_reach(&self) -> Option<f32> {
        match self.attack_clip? {
            Clip::Attack => Some(self.config.attack_range),
            Clip::RangedAttack | Clip::Ultimate => Some(self.config.ranged_attack_range),
            _ => None,
        }
    }

    /// Outstanding patrol move, if any.
    pub fn pending_move(&self) -> Option<MoveRequestId> {
        self.pending_move
    }

    /// Snapshot read by the scorer.
    pub fn scoring_facts(&self) -> ScoringFacts {
        ScoringFacts {
            enemy_detected: self.enemy_detected,
            in_attack_range: self.in_attack_range,
            in_ranged_range: self.in_ranged_range,
            enemy_attacking: self.enemy_attacking,
            can_strafe: self.can_strafe(),
            can_block: self.can_block(),
            can_dodge: self.can_dodge(),
        }
    }

    // ===== host-driven updates =====

    /// Applies a locomotion update reported by navigation.
    pub fn set_transform(&mut self, position: Position, yaw: f32) {
        self.position = position;
        self.yaw = yaw;
    }

    /// Re-arms the evaluation timer with a freshly sampled period.
    ///
    /// Dead agents are never re-armed.
    pub fn schedule_evaluation(&mut self, svc: &mut Services<'_>) -> Option<TimerToken> {
        if let Some(token) = self.evaluation.take() {
            svc.timers.cancel(token);
        }
        if self.is_dead() {
            return None;
        }

        let delay = svc
            .rng
            .sample(self.config.evaluation_period)
            .max(MIN_EVALUATION_DELAY);
        let token = svc
            .timers
            .schedule(delay, TimerTask::Evaluate { agent: self.id });
        self.evaluation = Some(token);
        Some(token)
    }

    /// The cooldown timer `token` fired: the ability is available again.
    ///
    /// Strafe expiry also forgets the held strafe direction. An expiry whose
    /// token is not the pending one for `cooldown` is stale and ignored.
    /// Returns whether the cooldown was cleared.
    pub fn cooldown_expired(&mut self, cooldown: Cooldown, token: TimerToken) -> bool {
        let slot = self.cooldowns.slot_mut(cooldown);
        if *slot != Some(token) {
            tracing::trace!(agent = %self.id, %cooldown, ?token, "stale cooldown expiry");
            return false;
        }
        *slot = None;
        if cooldown == Cooldown::Strafe {
            self.strafe_direction = StrafeDirection::None;
        }
        tracing::trace!(agent = %self.id, %cooldown, "cooldown ready");
        true
    }

    fn arm_cooldown(&mut self, cooldown: Cooldown, svc: &mut Services<'_>) {
        let range = match cooldown {
            Cooldown::Strafe => self.config.strafe_cooldown,
            Cooldown::Block => self.config.block_cooldown,
            Cooldown::Dodge => self.config.dodge_cooldown,
        };
        let delay = svc.rng.sample(range);
        let token = svc.timers.schedule(
            delay,
            TimerTask::CooldownExpired {
                agent: self.id,
                cooldown,
            },
        );
        if let Some(previous) = self.cooldowns.slot_mut(cooldown).replace(token) {
            svc.timers.cancel(previous);
        }
    }

    fn arm_action_timeout(&mut self, svc: &mut Services<'_>) {
        let token = svc.timers.schedule(
            self.config.action_timeout,
            TimerTask::ActionTimeout { agent: self.id },
        );
        if let Some(previous) = self.action_timeout.replace(token) {
            svc.timers.cancel(previous);
        }
    }

    /// Cancels every timer this agent owns.
    fn cancel_timers(&mut self, svc: &mut Services<'_>) {
        let tokens = [
            self.cooldowns.strafe.take(),
            self.cooldowns.block.take(),
            self.cooldowns.dodge.take(),
            self.action_timeout.take(),
            self.evaluation.take(),
        ];
        for token in tokens.into_iter().flatten() {
            svc.timers.cancel(token);
        }
    }
}

impl Combatant for Agent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn team(&self) -> TeamId {
        self.config.team
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.config.max_health
    }

    fn is_dead(&self) -> bool {
        self.fsm.is_dead()
    }

    fn is_attacking(&self) -> bool {
        self.fsm.flags().contains(ActionFlags::ATTACKING)
    }

    fn defensive_state(&self) -> DefensiveState {
        let flags = self.fsm.flags();
        if flags.contains(ActionFlags::DODGING) {
            DefensiveState::Dodging
        } else if flags.contains(ActionFlags::BLOCKING) {
            DefensiveState::Blocking
        } else {
            DefensiveState::None
        }
    }

    fn position(&self) -> Position {
        self.position
    }
}
