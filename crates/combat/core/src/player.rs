//! Player-controlled combatant.
//!
//! The player is never driven by the scorer. Input arrives as explicit
//! commands and the player only ever occupies `Unoccupied`, `Attacking`,
//! `Dodging` or `Dead`.

use std::collections::HashSet;

use crate::agent::DEATH_SECTIONS;
use crate::combatant::Combatant;
use crate::env::{Clip, Services};
use crate::fsm::{COMBO_VARIANTS, Release};
use crate::outcome::{CommandOutcome, DamageOutcome, IgnoreReason};
use crate::state::{AgentId, CombatState, DefensiveState, Position, TeamId};
use crate::timer::{TimerTask, TimerToken};

/// Direction of the current movement input; selects the dodge animation.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementInput {
    #[default]
    Forward,
    Backward,
    Left,
    Right,
}

impl MovementInput {
    pub const fn section(self) -> &'static str {
        match self {
            Self::Forward => "Forward",
            Self::Backward => "Backward",
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlayerCharacter {
    id: AgentId,
    team: TeamId,
    health: f32,
    max_health: f32,
    position: Position,
    yaw: f32,

    state: CombatState,
    /// Next attack section; advanced by the combo window.
    combo_index: u8,
    can_attack: bool,
    attacking: bool,
    dodging: bool,
    movement: MovementInput,

    already_damaged: HashSet<AgentId>,
    melee_damage: f32,
    action_timeout_secs: f32,
    action_timeout: Option<TimerToken>,
}

impl PlayerCharacter {
    pub const DEFAULT_MAX_HEALTH: f32 = 200.0;
    pub const MELEE_DAMAGE: f32 = 20.0;
    pub const ACTION_TIMEOUT: f32 = 3.0;
    pub const DEATH_BLEND_OUT: f32 = 0.1;

    pub fn new(id: AgentId, position: Position) -> Self {
        Self {
            id,
            team: TeamId::PLAYER,
            health: Self::DEFAULT_MAX_HEALTH,
            max_health: Self::DEFAULT_MAX_HEALTH,
            position,
            yaw: 0.0,
            state: CombatState::Unoccupied,
            combo_index: 0,
            can_attack: true,
            attacking: false,
            dodging: false,
            movement: MovementInput::default(),
            already_damaged: HashSet::new(),
            melee_damage: Self::MELEE_DAMAGE,
            action_timeout_secs: Self::ACTION_TIMEOUT,
            action_timeout: None,
        }
    }

    #[must_use]
    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self.health = max_health;
        self
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn combo_index(&self) -> u8 {
        self.combo_index
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn movement(&self) -> MovementInput {
        self.movement
    }

    pub fn melee_damage(&self) -> f32 {
        self.melee_damage
    }

    pub fn set_movement(&mut self, movement: MovementInput) {
        self.movement = movement;
    }

    pub fn set_transform(&mut self, position: Position, yaw: f32) {
        self.position = position;
        self.yaw = yaw;
    }

    /// Swings the section selected by the current combo index.
    ///
    /// Allowed from `Unoccupied`, or mid-attack once the combo window opened.
    pub fn attack_combo(&mut self, svc: &mut Services<'_>) -> CommandOutcome {
        match self.state {
            CombatState::Dead => return CommandOutcome::Ignored(IgnoreReason::Dead),
            CombatState::Dodging => {
                return CommandOutcome::Ignored(IgnoreReason::Busy(CombatState::Dodging));
            }
            _ if !self.can_attack => {
                return CommandOutcome::Ignored(IgnoreReason::Busy(self.state));
            }
            _ => {}
        }

        let section = match self.combo_index {
            1 => "Attack02",
            2 => "Attack03",
            3 => "Attack04",
            _ => "Attack01",
        };
        self.state = CombatState::Attacking;
        self.attacking = true;
        self.can_attack = false;
        self.already_damaged.clear();
        self.play(Clip::Attack, section, svc)
    }

    /// Opens the combo window of the swing in flight: the next
    /// [`Self::attack_combo`] continues with the following section.
    pub fn open_combo_window(&mut self) {
        if self.state == CombatState::Attacking {
            self.combo_index = (self.combo_index + 1) % COMBO_VARIANTS;
            self.can_attack = true;
        }
    }

    /// Rolls in the direction of the current movement input.
    pub fn dodge(&mut self, svc: &mut Services<'_>) -> CommandOutcome {
        match self.state {
            CombatState::Unoccupied => {}
            CombatState::Dead => return CommandOutcome::Ignored(IgnoreReason::Dead),
            busy => return CommandOutcome::Ignored(IgnoreReason::Busy(busy)),
        }

        self.state = CombatState::Dodging;
        self.dodging = true;
        self.play(Clip::Dodge, self.movement.section(), svc)
    }

    /// Dodging negates non-lethal hits; there is no block.
    pub fn take_damage(&mut self, amount: f32, svc: &mut Services<'_>) -> DamageOutcome {
        if self.state.is_dead() {
            return DamageOutcome::Ignored;
        }
        let amount = amount.max(0.0);

        if self.health - amount <= 0.0 {
            self.health = 0.0;
            self.death(svc);
            return DamageOutcome::Killed;
        }

        let applied = amount * self.defensive_state().damage_multiplier();
        self.health -= applied;
        tracing::debug!(player = %self.id, applied, remaining = self.health, "player hit");
        DamageOutcome::Applied {
            amount: applied,
            remaining: self.health,
        }
    }

    /// Idempotent. Returns `false` if already dead.
    pub fn death(&mut self, svc: &mut Services<'_>) -> bool {
        if self.state.is_dead() {
            return false;
        }

        svc.animation.stop_all(self.id, Self::DEATH_BLEND_OUT);
        let section = DEATH_SECTIONS[svc.rng.pick(DEATH_SECTIONS.len())];
        if let Err(err) = svc.animation.play_segment(self.id, Clip::Death, section) {
            tracing::warn!(player = %self.id, %err, "death animation failed");
        }
        if let Some(token) = self.action_timeout.take() {
            svc.timers.cancel(token);
        }

        self.health = 0.0;
        self.state = CombatState::Dead;
        self.attacking = false;
        self.dodging = false;
        self.already_damaged.clear();
        tracing::info!(player = %self.id, section, "player died");
        true
    }

    /// Completion signal for the action in flight.
    pub fn set_unoccupied(&mut self, svc: &mut Services<'_>) -> Release {
        if let Some(token) = self.action_timeout.take() {
            svc.timers.cancel(token);
        }
        self.combo_index = 0;
        self.can_attack = true;
        self.attacking = false;
        self.dodging = false;

        if self.state.is_dead() {
            svc.animation.freeze(self.id);
            return Release::Dead;
        }
        self.state = CombatState::Unoccupied;
        Release::Released
    }

    /// Same contract as [`crate::Agent::register_hit`].
    pub fn register_hit(&mut self, victim: AgentId) -> bool {
        if self.state.is_dead() || victim == self.id {
            return false;
        }
        self.already_damaged.insert(victim)
    }

    fn play(
        &mut self,
        clip: Clip,
        section: &'static str,
        svc: &mut Services<'_>,
    ) -> CommandOutcome {
        match svc.animation.play_segment(self.id, clip, section) {
            Ok(()) => {
                let token = svc.timers.schedule(
                    self.action_timeout_secs,
                    TimerTask::ActionTimeout { agent: self.id },
                );
                if let Some(previous) = self.action_timeout.replace(token) {
                    svc.timers.cancel(previous);
                }
                CommandOutcome::Executed
            }
            Err(err) => {
                tracing::warn!(player = %self.id, %err, "player animation failed");
                self.set_unoccupied(svc);
                CommandOutcome::Failed(err)
            }
        }
    }
}

impl Combatant for PlayerCharacter {
    fn id(&self) -> AgentId {
        self.id
    }

    fn team(&self) -> TeamId {
        self.team
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn is_dead(&self) -> bool {
        self.state.is_dead()
    }

    fn is_attacking(&self) -> bool {
        self.attacking
    }

    fn defensive_state(&self) -> DefensiveState {
        if self.dodging {
            DefensiveState::Dodging
        } else {
            DefensiveState::None
        }
    }

    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        AnimationService, MoveOrder, MoveRequestId, NavigationService, ScriptedRng, ServiceError,
    };
    use crate::timer::Scheduler;

    #[derive(Default)]
    struct Stage {
        played: Vec<(Clip, &'static str)>,
        frozen: bool,
    }

    impl AnimationService for Stage {
        fn play_segment(
            &mut self,
            _agent: AgentId,
            clip: Clip,
            section: &'static str,
        ) -> Result<(), ServiceError> {
            self.played.push((clip, section));
            Ok(())
        }

        fn stop_all(&mut self, _agent: AgentId, _blend_out: f32) {}

        fn freeze(&mut self, _agent: AgentId) {
            self.frozen = true;
        }
    }

    struct Still;

    impl NavigationService for Still {
        fn random_point_in_radius(
            &mut self,
            origin: Position,
            _radius: f32,
        ) -> Result<Position, ServiceError> {
            Ok(origin)
        }

        fn move_to(&mut self, _order: MoveOrder) -> Result<MoveRequestId, ServiceError> {
            Ok(MoveRequestId(0))
        }

        fn stop_movement(&mut self, _agent: AgentId) {}
    }

    fn player() -> PlayerCharacter {
        PlayerCharacter::new(AgentId::new(0, 0), Position::ORIGIN)
    }

    #[test]
    fn combo_window_advances_sections() {
        let (mut stage, mut nav, mut timers, mut rng) =
            (Stage::default(), Still, Scheduler::new(), ScriptedRng::new());
        let mut svc = Services::new(&mut nav, &mut stage, &mut timers, &mut rng);
        let mut player = player();

        assert!(player.attack_combo(&mut svc).is_executed());
        assert!(player.attack_combo(&mut svc).is_ignored());
        player.open_combo_window();
        assert!(player.attack_combo(&mut svc).is_executed());
        assert_eq!(player.set_unoccupied(&mut svc), Release::Released);
        assert_eq!(player.combo_index(), 0);
        drop(svc);

        let sections: Vec<_> = stage.played.iter().map(|(_, s)| *s).collect();
        assert_eq!(sections, ["Attack01", "Attack02"]);
    }

    #[test]
    fn dodge_follows_movement_input_and_negates_hits() {
        let (mut stage, mut nav, mut timers, mut rng) =
            (Stage::default(), Still, Scheduler::new(), ScriptedRng::new());
        let mut svc = Services::new(&mut nav, &mut stage, &mut timers, &mut rng);
        let mut player = player();

        player.set_movement(MovementInput::Left);
        assert!(player.dodge(&mut svc).is_executed());
        assert!(player.attack_combo(&mut svc).is_ignored());
        assert_eq!(
            player.take_damage(50.0, &mut svc),
            DamageOutcome::Applied {
                amount: 0.0,
                remaining: 200.0
            }
        );
        drop(svc);
        assert_eq!(stage.played, [(Clip::Dodge, "Left")]);
    }

    #[test]
    fn death_is_idempotent_and_freezes_on_release() {
        let (mut stage, mut nav, mut timers, mut rng) = (
            Stage::default(),
            Still,
            Scheduler::new(),
            ScriptedRng::new().with_ints([1]),
        );
        let mut svc = Services::new(&mut nav, &mut stage, &mut timers, &mut rng);
        let mut player = player();

        assert_eq!(player.take_damage(250.0, &mut svc), DamageOutcome::Killed);
        assert!(!player.death(&mut svc));
        assert_eq!(player.set_unoccupied(&mut svc), Release::Dead);
        assert_eq!(player.health(), 0.0);
        drop(svc);

        assert_eq!(stage.played, [(Clip::Death, "Death02")]);
        assert!(stage.frozen);
    }
}
