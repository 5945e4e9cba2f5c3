use super::Agent;
use crate::combatant::{Combatant, TargetView};
use crate::env::Services;
use crate::outcome::CommandOutcome;
use crate::scoring::{Ability, AbilityScorer, AbilityScores};
use crate::selector::ActionSelector;
use crate::state::CombatState;

/// Result of one utility evaluation tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Evaluation {
    /// Dead agents are never evaluated.
    Dead,
    /// An action is in flight; nothing was scored.
    Busy(CombatState),
    /// An ability cleared the draw and was dispatched.
    Decided {
        scores: AbilityScores,
        draw: f32,
        ability: Ability,
        outcome: CommandOutcome,
    },
    /// Nothing was dispatched. `scores` is `None` when scoring was gated off
    /// for lack of an enemy. `patrol` holds the outcome of the patrol attempt
    /// if the agent is allowed to patrol.
    Idle {
        scores: Option<AbilityScores>,
        patrol: Option<CommandOutcome>,
    },
}

impl Evaluation {
    pub fn ability(&self) -> Option<Ability> {
        match self {
            Self::Decided { ability, .. } => Some(*ability),
            _ => None,
        }
    }
}

impl Agent {
    /// Scores every ability, draws once, and dispatches the selected one.
    ///
    /// `target` is the resolved view of [`Agent::enemy`]. A rejected command
    /// is not retried within the same tick.
    pub fn evaluate(
        &mut self,
        target: Option<&TargetView>,
        svc: &mut Services<'_>,
    ) -> Evaluation {
        if self.is_dead() {
            return Evaluation::Dead;
        }
        self.refresh_ranges(target);

        let state = self.fsm.state();
        if state != CombatState::Unoccupied {
            return Evaluation::Busy(state);
        }

        let scores = if self.config.evaluate_only_when_enemy_detected && !self.enemy_detected {
            None
        } else {
            let scores = AbilityScorer::evaluate(&self.profile, &self.scoring_facts());
            let draw = svc.rng.next_f32();
            if let Some(ability) = ActionSelector::select(&scores, draw) {
                let outcome = self.dispatch(ability, target, svc);
                tracing::debug!(agent = %self.id, %ability, draw, ?outcome, "ability dispatched");
                return Evaluation::Decided {
                    scores,
                    draw,
                    ability,
                    outcome,
                };
            }
            Some(scores)
        };

        let patrol = (self.config.can_patrol && !self.enemy_detected).then(|| self.patrol(svc));
        Evaluation::Idle { scores, patrol }
    }
}
