//! Prioritized-dithering action selection.
//!
//! One uniform draw `r ∈ [0, 1)` is taken per evaluation. Abilities are
//! scanned in [`Ability::ALL`] order and every ability with a positive score
//! above `r` overwrites the previous pick, so the *last* qualifying ability in
//! scan order wins rather than the highest-scoring one. Low-propensity
//! abilities still fire occasionally while zero-scored abilities never do.

use crate::scoring::{Ability, AbilityScores};

pub struct ActionSelector;

impl ActionSelector {
    /// Picks an ability for the draw `r`, or `None` when nothing qualifies.
    pub fn select(scores: &AbilityScores, r: f32) -> Option<Ability> {
        let mut chosen = None;
        for (ability, score) in scores.iter() {
            if score > 0.0 && r < score {
                chosen = Some(ability);
            }
        }

        match chosen {
            Some(ability) => tracing::debug!(%ability, r, "ability selected"),
            None => tracing::trace!(r, "no ability cleared the draw"),
        }
        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scores(pairs: &[(Ability, f32)]) -> AbilityScores {
        let mut scores = AbilityScores::zero();
        for &(ability, value) in pairs {
            scores.set(ability, value);
        }
        scores
    }

    #[test]
    fn all_zero_selects_nothing() {
        assert_eq!(ActionSelector::select(&AbilityScores::zero(), 0.0), None);
    }

    #[test]
    fn last_qualifying_ability_wins() {
        let scores = scores(&[(Ability::Seek, 0.9), (Ability::Attack, 0.3)]);
        assert_eq!(ActionSelector::select(&scores, 0.1), Some(Ability::Attack));
        // Attack no longer clears the draw, Seek is the last qualifier.
        assert_eq!(ActionSelector::select(&scores, 0.5), Some(Ability::Seek));
        assert_eq!(ActionSelector::select(&scores, 0.95), None);
    }

    #[test]
    fn draw_equal_to_score_does_not_qualify() {
        let scores = scores(&[(Ability::Block, 0.6)]);
        assert_eq!(ActionSelector::select(&scores, 0.6), None);
    }

    #[test]
    fn melee_engagement_picks_attack_on_low_draw() {
        let scores = scores(&[
            (Ability::Strafe, 0.75),
            (Ability::Attack, 0.6),
            (Ability::Ultimate, 0.025),
        ]);
        assert_eq!(ActionSelector::select(&scores, 0.05), Some(Ability::Attack));
    }

    proptest! {
        #[test]
        fn selection_is_reproducible_for_a_fixed_draw(
            values in prop::array::uniform7(0.0f32..=1.0),
            r in 0.0f32..1.0,
        ) {
            let scores = AbilityScores::from_array(values);
            let first = ActionSelector::select(&scores, r);
            prop_assert_eq!(first, ActionSelector::select(&scores, r));
            if let Some(ability) = first {
                prop_assert!(scores.get(ability) > r);
            }
        }
    }
}
