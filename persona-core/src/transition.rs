//! Markov-style transitions between emotional states, modulated by
//! personality traits.
//!
//! The engine draws the next dominant emotional category from a 6×6
//! transition matrix, then moves every emotion toward a category-dependent
//! target scaled by volatility. The caller supplies the random source, so
//! a seeded [`rand::rngs::StdRng`] reproduces trajectories exactly.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::coefficients::coefficient;
use crate::emotion::{Emotion, EmotionCategory, CATEGORY_COUNT};
use crate::error::{PersonaError, Result};
use crate::state::EmotionalState;
use crate::traits::{PersonalityTrait, TraitProfile};

/// Default category-to-category transition probabilities.
///
/// Rows follow [`EmotionCategory::ALL`] order (anger, sad, fear, joy,
/// powerful, peaceful); each row sums to 1.0. The diagonal dominates —
/// moods are sticky.
pub const DEFAULT_CATEGORY_TRANSITIONS: [[f64; CATEGORY_COUNT]; CATEGORY_COUNT] = [
    // from Anger
    [0.4, 0.2, 0.15, 0.05, 0.1, 0.1],
    // from Sad
    [0.15, 0.4, 0.2, 0.05, 0.05, 0.15],
    // from Fear
    [0.1, 0.2, 0.4, 0.05, 0.1, 0.15],
    // from Joy
    [0.05, 0.05, 0.05, 0.5, 0.2, 0.15],
    // from Powerful
    [0.1, 0.05, 0.05, 0.25, 0.4, 0.15],
    // from Peaceful
    [0.05, 0.1, 0.05, 0.2, 0.15, 0.45],
];

fn category_index(category: EmotionCategory) -> usize {
    EmotionCategory::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or(CATEGORY_COUNT - 1)
}

/// Probabilistic transition engine over emotional categories.
///
/// Transition probabilities can be customized per instance; volatility
/// controls how far emotions move per step.
#[derive(Debug, Clone)]
pub struct TransitionMatrix {
    transitions: [[f64; CATEGORY_COUNT]; CATEGORY_COUNT],
    volatility: f64,
}

impl TransitionMatrix {
    /// Create a matrix with the default transition table and the given
    /// volatility.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `volatility` is outside
    /// `[0.0, 1.0]`.
    pub fn new(volatility: f64) -> Result<Self> {
        Self::with_transitions(DEFAULT_CATEGORY_TRANSITIONS, volatility)
    }

    /// Create a matrix with a custom transition table.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `volatility` is outside
    /// `[0.0, 1.0]`, or [`PersonaError::Validation`] if any row has no
    /// positive weight.
    pub fn with_transitions(
        transitions: [[f64; CATEGORY_COUNT]; CATEGORY_COUNT],
        volatility: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&volatility) {
            return Err(PersonaError::OutOfRange {
                field: "volatility".to_string(),
                value: volatility,
            });
        }
        for (i, row) in transitions.iter().enumerate() {
            if !row.iter().any(|w| *w > 0.0) {
                return Err(PersonaError::Validation(format!(
                    "transition row for category '{}' has no positive weight",
                    EmotionCategory::ALL[i]
                )));
            }
        }
        Ok(Self {
            transitions,
            volatility,
        })
    }

    /// The volatility factor.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Base probability of transitioning between two categories.
    #[must_use]
    pub fn transition_probability(&self, from: EmotionCategory, to: EmotionCategory) -> f64 {
        self.transitions[category_index(from)][category_index(to)]
    }

    /// Apply trait modifiers to a transition target value.
    ///
    /// Each trait shifts the value by `coefficient × (trait − 0.5)` —
    /// centered on the population average, so an average profile changes
    /// nothing. The result is clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn apply_trait_modifiers(
        &self,
        base: f64,
        target_emotion: Emotion,
        traits: &TraitProfile,
    ) -> f64 {
        let mut modifier = 0.0;
        for trait_ in PersonalityTrait::ALL {
            let coeff = coefficient(trait_, target_emotion);
            if coeff != 0.0 {
                modifier += coeff * (traits.get(trait_) - 0.5);
            }
        }
        (base * (1.0 + modifier)).clamp(0.0, 1.0)
    }

    /// Compute the next emotional state.
    ///
    /// The dominant emotion's category selects a transition row; a
    /// weighted draw picks the next category. Emotions in the chosen
    /// category move up, all others bleed down, with per-emotion trait
    /// modification and volatility scaling. The input state is not
    /// mutated.
    pub fn next_state<R: Rng + ?Sized>(
        &self,
        current: &EmotionalState,
        traits: Option<&TraitProfile>,
        rng: &mut R,
    ) -> EmotionalState {
        let dominant_category = current
            .dominant()
            .map_or(EmotionCategory::Peaceful, |(e, _)| e.category());

        let row = &self.transitions[category_index(dominant_category)];
        // Row weights are validated positive at construction.
        let next_category = match WeightedIndex::new(row.iter().copied()) {
            Ok(dist) => EmotionCategory::ALL[dist.sample(rng)],
            Err(_) => dominant_category,
        };

        let mut next = current.clone();
        for emotion in Emotion::ALL {
            if !current.tracks(emotion) {
                continue;
            }
            let value = current.get(emotion).unwrap_or(0.0);

            let mut target = if emotion.category() == next_category {
                (value + self.volatility * 0.5).min(1.0)
            } else {
                (value - self.volatility * 0.25).max(0.0)
            };
            if let Some(traits) = traits {
                target = self.apply_trait_modifiers(target, emotion, traits);
            }

            let delta = (target - value) * self.volatility;
            // set() cannot fail here: the emotion is tracked and the value
            // is clamped into range.
            let _ = next.set(emotion, (value + delta).clamp(0.0, 1.0));
        }
        next
    }

    /// Simulate a trajectory of `steps` transitions. The returned vector
    /// includes the initial state, so its length is `steps + 1`.
    pub fn simulate_trajectory<R: Rng + ?Sized>(
        &self,
        initial: &EmotionalState,
        steps: usize,
        traits: Option<&TraitProfile>,
        rng: &mut R,
    ) -> Vec<EmotionalState> {
        let mut trajectory = Vec::with_capacity(steps + 1);
        trajectory.push(initial.clone());
        let mut current = initial.clone();
        for _ in 0..steps {
            current = self.next_state(&current, traits, rng);
            trajectory.push(current.clone());
        }
        trajectory
    }
}

impl Default for TransitionMatrix {
    fn default() -> Self {
        Self {
            transitions: DEFAULT_CATEGORY_TRANSITIONS,
            volatility: 0.2,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rows_sum_to_one() {
        for row in DEFAULT_CATEGORY_TRANSITIONS {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn volatility_is_validated() {
        assert!(TransitionMatrix::new(0.5).is_ok());
        assert!(TransitionMatrix::new(1.5).is_err());
        assert!(TransitionMatrix::new(-0.1).is_err());
    }

    #[test]
    fn transition_probability_reads_the_table() {
        let matrix = TransitionMatrix::default();
        let p = matrix.transition_probability(EmotionCategory::Fear, EmotionCategory::Joy);
        assert!((p - 0.05).abs() < 1e-12);
    }

    #[test]
    fn stability_reduces_anxiety_target() {
        let matrix = TransitionMatrix::default();
        let mut traits = TraitProfile::new();
        traits
            .set(PersonalityTrait::EmotionalStability, 0.9)
            .unwrap();
        let modified = matrix.apply_trait_modifiers(0.5, Emotion::Anxious, &traits);
        assert!(modified < 0.5);
    }

    #[test]
    fn average_traits_change_nothing() {
        let matrix = TransitionMatrix::default();
        let traits = TraitProfile::new();
        let modified = matrix.apply_trait_modifiers(0.5, Emotion::Anxious, &traits);
        assert!((modified - 0.5).abs() < 1e-12);
    }

    #[test]
    fn next_state_stays_in_bounds() {
        let matrix = TransitionMatrix::new(0.8).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = EmotionalState::new();
        state.set(Emotion::Anxious, 0.9).unwrap();

        for _ in 0..50 {
            state = matrix.next_state(&state, None, &mut rng);
            for emotion in Emotion::ALL {
                let v = state.get(emotion).unwrap();
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn seeded_rng_reproduces_trajectories() {
        let matrix = TransitionMatrix::default();
        let mut initial = EmotionalState::new();
        initial.set(Emotion::Cheerful, 0.7).unwrap();
        let traits = TraitProfile::new();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let run_a = matrix.simulate_trajectory(&initial, 10, Some(&traits), &mut rng_a);
        let run_b = matrix.simulate_trajectory(&initial, 10, Some(&traits), &mut rng_b);
        assert_eq!(run_a, run_b);
    }

    #[test]
    fn trajectory_length_includes_initial_state() {
        let matrix = TransitionMatrix::default();
        let mut rng = StdRng::seed_from_u64(1);
        let trajectory =
            matrix.simulate_trajectory(&EmotionalState::new(), 5, None, &mut rng);
        assert_eq!(trajectory.len(), 6);
    }
}
