use super::Agent;
use crate::combatant::{Combatant, TargetView};
use crate::env::{Clip, DEFAULT_SECTION, MoveOrder, MoveRequestId, Services};
use crate::fsm::{COMBO_VARIANTS, Release};
use crate::outcome::{CommandOutcome, IgnoreReason};
use crate::scoring::Ability;
use crate::state::{ActionFlags, CombatState, StrafeDirection};
use crate::timer::Cooldown;

const ATTACK_SECTIONS: [&str; COMBO_VARIANTS as usize] =
    ["Attack01", "Attack02", "Attack03", "Attack04"];
const DODGE_SECTIONS: [&str; 2] = ["Left", "Right"];

impl Agent {
    /// Runs the command mapped to `ability`.
    pub fn dispatch(
        &mut self,
        ability: Ability,
        target: Option<&TargetView>,
        svc: &mut Services<'_>,
    ) -> CommandOutcome {
        match ability {
            Ability::Seek => self.seek_enemy(target, svc),
            Ability::Strafe => self.strafe_around_enemy(target, svc),
            Ability::Attack => self.attack_combo(svc),
            Ability::RangedAttack => self.ranged_attack(svc),
            Ability::Ultimate => self.ultimate_attack(svc),
            Ability::Dodge => self.dodging(svc),
            Ability::Block => self.blocking(svc),
        }
    }

    /// Melee swing using one of the combo variants, picked uniformly.
    pub fn attack_combo(&mut self, svc: &mut Services<'_>) -> CommandOutcome {
        if let Err(reason) = self.ensure_free() {
            return CommandOutcome::Ignored(reason);
        }
        if !self.in_attack_range {
            return CommandOutcome::Ignored(IgnoreReason::OutOfRange);
        }
        if let Err(reason) = self.enter(CombatState::Attacking) {
            return CommandOutcome::Ignored(reason);
        }

        let variant = svc.rng.pick(ATTACK_SECTIONS.len());
        self.fsm.set_combo_index(variant as u8);
        self.begin_attack(Clip::Attack);
        self.play(Clip::Attack, ATTACK_SECTIONS[variant], svc)
    }

    pub fn ranged_attack(&mut self, svc: &mut Services<'_>) -> CommandOutcome {
        if let Err(reason) = self.enter(CombatState::Attacking) {
            return CommandOutcome::Ignored(reason);
        }
        self.begin_attack(Clip::RangedAttack);
        self.play(Clip::RangedAttack, DEFAULT_SECTION, svc)
    }

    pub fn ultimate_attack(&mut self, svc: &mut Services<'_>) -> CommandOutcome {
        if let Err(reason) = self.enter(CombatState::Attacking) {
            return CommandOutcome::Ignored(reason);
        }
        self.begin_attack(Clip::Ultimate);
        self.play(Clip::Ultimate, DEFAULT_SECTION, svc)
    }

    /// Raises a guard that halves incoming non-lethal damage, and arms the
    /// block cooldown.
    pub fn blocking(&mut self, svc: &mut Services<'_>) -> CommandOutcome {
        if let Err(reason) = self.enter(CombatState::Blocking) {
            return CommandOutcome::Ignored(reason);
        }
        self.fsm.raise(ActionFlags::BLOCKING);
        self.arm_cooldown(Cooldown::Block, svc);
        self.play(Clip::Block, DEFAULT_SECTION, svc)
    }

    /// Sidesteps in a random direction, negating incoming non-lethal damage,
    /// and arms the dodge cooldown.
    pub fn dodging(&mut self, svc: &mut Services<'_>) -> CommandOutcome {
        if let Err(reason) = self.enter(CombatState::Dodging) {
            return CommandOutcome::Ignored(reason);
        }
        self.fsm.raise(ActionFlags::DODGING);
        let section = DODGE_SECTIONS[svc.rng.pick(DODGE_SECTIONS.len())];
        self.arm_cooldown(Cooldown::Dodge, svc);
        self.play(Clip::Dodge, section, svc)
    }

    /// Fire-and-forget move towards the enemy. The agent is released as soon
    /// as the order is issued.
    pub fn seek_enemy(
        &mut self,
        target: Option<&TargetView>,
        svc: &mut Services<'_>,
    ) -> CommandOutcome {
        if let Err(reason) = self.ensure_free() {
            return CommandOutcome::Ignored(reason);
        }
        if !self.config.aggressive {
            return CommandOutcome::Ignored(IgnoreReason::NotAggressive);
        }
        let Some(target) = self.live_enemy(target) else {
            return CommandOutcome::Ignored(IgnoreReason::NoTarget);
        };
        if let Err(reason) = self.enter(CombatState::Seek) {
            return CommandOutcome::Ignored(reason);
        }

        self.yaw = self.position.yaw_towards(target.position);
        let order = MoveOrder {
            agent: self.id,
            from: self.position,
            destination: target.position,
            acceptance_radius: self.config.acceptance_radius,
            stop_on_overlap: true,
        };
        let result = svc.navigation.move_to(order);
        self.release(svc);

        match result {
            Ok(_) => CommandOutcome::Executed,
            Err(err) => {
                tracing::warn!(agent = %self.id, %err, "seek move rejected");
                CommandOutcome::Failed(err)
            }
        }
    }

    /// Lateral move around the enemy, then release.
    ///
    /// The direction is rolled the first time the agent strafes and held until
    /// the strafe cooldown expires.
    pub fn strafe_around_enemy(
        &mut self,
        target: Option<&TargetView>,
        svc: &mut Services<'_>,
    ) -> CommandOutcome {
        if let Err(reason) = self.enter(CombatState::Strafe) {
            return CommandOutcome::Ignored(reason);
        }

        if let Some(target) = self.live_enemy(target) {
            self.yaw = self.position.yaw_towards(target.position);
        }
        if self.strafe_direction == StrafeDirection::None {
            let choices = StrafeDirection::CHOICES;
            self.strafe_direction = choices[svc.rng.pick(choices.len())];
        }

        let (forward, right) = self.strafe_direction.local_offset(self.config.strafe_offset);
        let order = MoveOrder {
            agent: self.id,
            from: self.position,
            destination: self.position.offset_local(forward, right, self.yaw),
            acceptance_radius: self.config.acceptance_radius,
            stop_on_overlap: false,
        };
        let result = svc.navigation.move_to(order);
        self.arm_cooldown(Cooldown::Strafe, svc);
        self.release(svc);

        match result {
            Ok(_) => CommandOutcome::Executed,
            Err(err) => {
                tracing::warn!(agent = %self.id, %err, "strafe move rejected");
                CommandOutcome::Failed(err)
            }
        }
    }

    /// Wanders to a random navigable point within the patrol radius. The agent
    /// stays in `Patrol` until the move completes.
    pub fn patrol(&mut self, svc: &mut Services<'_>) -> CommandOutcome {
        if let Err(reason) = self.ensure_free() {
            return CommandOutcome::Ignored(reason);
        }
        if !self.config.can_patrol {
            return CommandOutcome::Ignored(IgnoreReason::CannotPatrol);
        }
        if self.enemy_detected {
            return CommandOutcome::Ignored(IgnoreReason::EnemyDetected);
        }
        if let Err(reason) = self.enter(CombatState::Patrol) {
            return CommandOutcome::Ignored(reason);
        }

        let result = svc
            .navigation
            .random_point_in_radius(self.position, self.config.patrol_radius)
            .and_then(|destination| {
                self.yaw = self.position.yaw_towards(destination);
                svc.navigation.move_to(MoveOrder {
                    agent: self.id,
                    from: self.position,
                    destination,
                    acceptance_radius: self.config.acceptance_radius,
                    stop_on_overlap: false,
                })
            });

        match result {
            Ok(request) => {
                self.pending_move = Some(request);
                CommandOutcome::Executed
            }
            Err(err) => {
                tracing::warn!(agent = %self.id, %err, "patrol move rejected");
                self.release(svc);
                CommandOutcome::Failed(err)
            }
        }
    }

    /// Navigation reported the end of a move order.
    ///
    /// Finishing the outstanding patrol move releases the agent whether or
    /// not the destination was reached. Returns `true` if the agent was
    /// released.
    pub fn move_completed(
        &mut self,
        request: MoveRequestId,
        success: bool,
        svc: &mut Services<'_>,
    ) -> bool {
        if self.pending_move != Some(request) {
            return false;
        }
        self.pending_move = None;
        tracing::trace!(agent = %self.id, success, "patrol move finished");

        if self.fsm.state() == CombatState::Patrol {
            self.release(svc);
            return true;
        }
        false
    }

    /// Completion signal for the action in flight.
    ///
    /// Resets the combo and sub-flags, drops the enemy reference if `target`
    /// shows it dead or gone, then either returns to `Unoccupied` or, if this
    /// agent died meanwhile, pins it to `Dead` and freezes its pose.
    pub fn set_unoccupied(
        &mut self,
        target: Option<&TargetView>,
        svc: &mut Services<'_>,
    ) -> Release {
        if let Some(enemy) = self.enemy {
            let enemy_gone = target.is_none_or(|view| view.id != enemy || view.is_dead);
            if enemy_gone {
                tracing::debug!(agent = %self.id, %enemy, "enemy gone, clearing reference");
                self.clear_enemy();
            }
        }
        self.release(svc)
    }

    /// Releases the state machine without touching the enemy reference.
    pub(super) fn release(&mut self, svc: &mut Services<'_>) -> Release {
        if let Some(token) = self.action_timeout.take() {
            svc.timers.cancel(token);
        }
        self.pending_move = None;
        self.attack_clip = None;

        let release = self.fsm.set_unoccupied(self.is_dead());
        if release == Release::Dead {
            svc.animation.freeze(self.id);
        }
        release
    }

    fn ensure_free(&self) -> Result<(), IgnoreReason> {
        match self.fsm.state() {
            CombatState::Unoccupied => Ok(()),
            CombatState::Dead => Err(IgnoreReason::Dead),
            busy => Err(IgnoreReason::Busy(busy)),
        }
    }

    fn enter(&mut self, next: CombatState) -> Result<(), IgnoreReason> {
        self.ensure_free()?;
        if self.fsm.try_enter(next).is_entered() {
            Ok(())
        } else {
            Err(IgnoreReason::Busy(self.fsm.state()))
        }
    }

    /// Resolves `target` against the tracked enemy; `None` if it does not
    /// match or is dead.
    fn live_enemy<'t>(&self, target: Option<&'t TargetView>) -> Option<&'t TargetView> {
        let enemy = self.enemy?;
        target.filter(|view| view.id == enemy && !view.is_dead)
    }

    fn begin_attack(&mut self, clip: Clip) {
        self.fsm.raise(ActionFlags::ATTACKING);
        self.already_damaged.clear();
        self.attack_clip = Some(clip);
    }

    /// Plays the action's animation and arms the completion fallback. A
    /// presentation failure releases the agent on the spot.
    fn play(
        &mut self,
        clip: Clip,
        section: &'static str,
        svc: &mut Services<'_>,
    ) -> CommandOutcome {
        tracing::debug!(
            agent = %self.id,
            state = %self.fsm.state(),
            %clip,
            section,
            "action started"
        );
        match svc.animation.play_segment(self.id, clip, section) {
            Ok(()) => {
                self.arm_action_timeout(svc);
                CommandOutcome::Executed
            }
            Err(err) => {
                tracing::warn!(agent = %self.id, %err, "animation failed, releasing");
                self.release(svc);
                CommandOutcome::Failed(err)
            }
        }
    }
}
