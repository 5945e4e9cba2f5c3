//! Combat state machine enforcing one action in flight per agent.
//!
//! # Transition Rules
//!
//! ```text
//!               try_enter(s)                set_unoccupied()
//! Unoccupied ─────────────────▶ s ──────────────────────────▶ Unoccupied
//!     │                         │
//!     └──────── force_dead() ───┴──────────▶ Dead (absorbing)
//! ```
//!
//! - Entering any action state is only legal from `Unoccupied`; anything else
//!   is rejected silently and leaves the machine untouched.
//! - `force_dead` bypasses the guard: death always wins.
//! - `Dead` never transitions again.

use crate::state::{ActionFlags, CombatState};

/// Number of attack animation variants a combo can select from.
pub const COMBO_VARIANTS: u8 = 4;

/// Result of asking the state machine to enter a new action state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    Entered,
    /// The machine was busy (or dead); nothing changed.
    Rejected { current: CombatState },
}

impl Transition {
    #[inline]
    pub const fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

/// What `set_unoccupied` resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// Back to `Unoccupied`.
    Released,
    /// The owner is dead; the machine is pinned to `Dead`.
    Dead,
}

/// Holds the single current combat state of one agent plus the transient
/// bookkeeping that is reset whenever the agent is released.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CombatStateMachine {
    state: CombatState,
    flags: ActionFlags,
    combo_index: u8,
}

impl CombatStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> CombatState {
        self.state
    }

    #[inline]
    pub fn flags(&self) -> ActionFlags {
        self.flags
    }

    /// Attack variant selected for the current combo (0..[`COMBO_VARIANTS`]).
    #[inline]
    pub fn combo_index(&self) -> u8 {
        self.combo_index
    }

    #[inline]
    pub fn is_unoccupied(&self) -> bool {
        self.state == CombatState::Unoccupied
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state.is_dead()
    }

    /// Attempts to start an action.
    ///
    /// Entering `Unoccupied` or `Dead` through this method is always rejected;
    /// use [`Self::set_unoccupied`] and [`Self::force_dead`] instead.
    pub fn try_enter(&mut self, next: CombatState) -> Transition {
        if self.state != CombatState::Unoccupied || !next.is_occupied() {
            return Transition::Rejected {
                current: self.state,
            };
        }

        tracing::trace!(from = %self.state, to = %next, "combat state transition");
        self.state = next;
        Transition::Entered
    }

    /// Raises transient sub-flags for the action in flight.
    ///
    /// No-op unless an action is in flight.
    pub fn raise(&mut self, flags: ActionFlags) {
        if self.state.is_occupied() {
            self.flags |= flags;
        }
    }

    /// Selects the attack variant for the action in flight, wrapping into range.
    pub fn set_combo_index(&mut self, index: u8) {
        if self.state.is_occupied() {
            self.combo_index = index % COMBO_VARIANTS;
        }
    }

    /// Releases the machine after an action completes.
    ///
    /// Resets the combo index and all sub-flags. If `owner_dead` is set the
    /// machine is pinned to `Dead` instead of returning to `Unoccupied`.
    pub fn set_unoccupied(&mut self, owner_dead: bool) -> Release {
        self.combo_index = 0;
        self.flags = ActionFlags::empty();

        if owner_dead || self.state.is_dead() {
            self.state = CombatState::Dead;
            return Release::Dead;
        }

        if self.state != CombatState::Unoccupied {
            tracing::trace!(from = %self.state, "combat state released");
        }
        self.state = CombatState::Unoccupied;
        Release::Released
    }

    /// Unconditionally enters the terminal state.
    ///
    /// Returns `false` if the machine was already dead.
    pub fn force_dead(&mut self) -> bool {
        if self.state.is_dead() {
            return false;
        }
        self.state = CombatState::Dead;
        self.flags = ActionFlags::empty();
        self.combo_index = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn starts_unoccupied() {
        let fsm = CombatStateMachine::new();
        assert_eq!(fsm.state(), CombatState::Unoccupied);
        assert_eq!(fsm.combo_index(), 0);
    }

    #[test]
    fn enters_action_only_from_unoccupied() {
        let mut fsm = CombatStateMachine::new();
        assert!(fsm.try_enter(CombatState::Attacking).is_entered());

        for next in CombatState::iter() {
            assert_eq!(
                fsm.try_enter(next),
                Transition::Rejected {
                    current: CombatState::Attacking
                }
            );
        }
        assert_eq!(fsm.state(), CombatState::Attacking);
    }

    #[test]
    fn cannot_enter_unoccupied_or_dead_through_guard() {
        let mut fsm = CombatStateMachine::new();
        assert!(!fsm.try_enter(CombatState::Unoccupied).is_entered());
        assert!(!fsm.try_enter(CombatState::Dead).is_entered());
        assert_eq!(fsm.state(), CombatState::Unoccupied);
    }

    #[test]
    fn release_resets_combo_and_flags() {
        let mut fsm = CombatStateMachine::new();
        assert!(fsm.try_enter(CombatState::Attacking).is_entered());
        fsm.raise(ActionFlags::ATTACKING);
        fsm.set_combo_index(3);

        assert_eq!(fsm.set_unoccupied(false), Release::Released);
        assert_eq!(fsm.state(), CombatState::Unoccupied);
        assert_eq!(fsm.combo_index(), 0);
        assert!(fsm.flags().is_empty());
    }

    #[test]
    fn release_of_dead_owner_pins_dead() {
        let mut fsm = CombatStateMachine::new();
        assert!(fsm.try_enter(CombatState::Blocking).is_entered());

        assert_eq!(fsm.set_unoccupied(true), Release::Dead);
        assert_eq!(fsm.state(), CombatState::Dead);
    }

    #[test]
    fn death_bypasses_guard_and_is_absorbing() {
        let mut fsm = CombatStateMachine::new();
        assert!(fsm.try_enter(CombatState::Dodging).is_entered());

        assert!(fsm.force_dead());
        assert!(!fsm.force_dead());
        assert_eq!(fsm.set_unoccupied(false), Release::Dead);
        assert!(!fsm.try_enter(CombatState::Attacking).is_entered());
        assert_eq!(fsm.state(), CombatState::Dead);
    }

    #[test]
    fn flags_only_raise_while_occupied() {
        let mut fsm = CombatStateMachine::new();
        fsm.raise(ActionFlags::BLOCKING);
        assert!(fsm.flags().is_empty());
    }
}
