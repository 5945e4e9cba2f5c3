//! Per-tick score vector construction.

use super::{Ability, AbilityScores, Score, ScoringFacts};
use crate::profile::CombatBehaviorProfile;

/// Builds the [`AbilityScores`] vector for one evaluation tick.
///
/// Pure and allocation-free: the same profile and facts always produce the
/// same vector.
pub struct AbilityScorer;

impl AbilityScorer {
    /// Scores every ability for an agent with the given archetype `profile`.
    pub fn evaluate(profile: &CombatBehaviorProfile, facts: &ScoringFacts) -> AbilityScores {
        let mut scores = AbilityScores::zero();

        for ability in Ability::ALL {
            let score = Self::score(ability, profile, facts);
            let value = score.value();

            tracing::trace!(
                %ability,
                weight = score.weight,
                conditions = ?score.conditions.as_slice(),
                value,
                "ability scored"
            );

            scores.set(ability, value);
        }

        tracing::debug!(?scores, ?facts, "ability scores evaluated");
        scores
    }

    /// Detailed score for a single ability.
    pub fn score(
        ability: Ability,
        profile: &CombatBehaviorProfile,
        facts: &ScoringFacts,
    ) -> Score {
        facts
            .conditions(ability)
            .into_iter()
            .fold(Score::new(profile.weight(ability)), Score::with_condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_melee() -> ScoringFacts {
        ScoringFacts {
            enemy_detected: true,
            in_attack_range: true,
            can_strafe: true,
            can_block: true,
            can_dodge: true,
            ..ScoringFacts::default()
        }
    }

    #[test]
    fn no_enemy_scores_everything_zero() {
        let scores = AbilityScorer::evaluate(
            &CombatBehaviorProfile::uniform(1.0),
            &ScoringFacts {
                can_strafe: true,
                ..ScoringFacts::default()
            },
        );
        assert!(scores.is_all_zero());
    }

    #[test]
    fn attack_combines_propensity_with_condition() {
        let profile = CombatBehaviorProfile::new(0.5, 0.0, 0.0, 0.0, 0.0);
        let scores = AbilityScorer::evaluate(&profile, &in_melee());

        assert!((scores.get(Ability::Attack) - 0.3).abs() < 1e-6);
        assert_eq!(scores.get(Ability::Seek), 0.0);
        assert_eq!(scores.get(Ability::RangedAttack), 0.0);
        assert_eq!(scores.get(Ability::Ultimate), 0.0);
    }

    #[test]
    fn movement_is_scored_without_profile_bias() {
        let profile = CombatBehaviorProfile::uniform(0.0);
        let far = ScoringFacts {
            in_attack_range: false,
            ..in_melee()
        };
        let scores = AbilityScorer::evaluate(&profile, &far);

        assert!((scores.get(Ability::Seek) - 0.9).abs() < 1e-6);
        assert!((scores.get(Ability::Strafe) - 0.75).abs() < 1e-6);
        assert_eq!(scores.get(Ability::Attack), 0.0);
    }

    #[test]
    fn defenders_react_to_swings() {
        let facts = ScoringFacts {
            enemy_attacking: true,
            ..in_melee()
        };
        let scores = AbilityScorer::evaluate(&CombatBehaviorProfile::DEFENDER, &facts);

        assert!((scores.get(Ability::Block) - 0.9 * 0.6).abs() < 1e-6);
        assert!((scores.get(Ability::Dodge) - 0.7 * 0.5).abs() < 1e-6);
    }
}
