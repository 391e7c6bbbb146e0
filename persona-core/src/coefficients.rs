//! Static trait → emotion influence coefficients.
//!
//! Each trait carries signed weights in `[-1.0, 1.0]` describing how
//! strongly it modulates movement toward (positive) or away from
//! (negative) an emotion. The table is fixed data, never learned or
//! mutated at runtime.

use crate::emotion::Emotion;
use crate::traits::{PersonalityTrait, TraitProfile};

// ---------------------------------------------------------------------------
// Coefficient table
// ---------------------------------------------------------------------------

const WARMTH: &[(Emotion, f64)] = &[
    (Emotion::Loving, 0.4),
    (Emotion::Trusting, 0.3),
    (Emotion::Nurturing, 0.3),
    (Emotion::Intimate, 0.3),
    (Emotion::Hostile, -0.5),
    (Emotion::Critical, -0.3),
    (Emotion::Lonely, -0.2),
    (Emotion::Hateful, -0.4),
];

const REASONING: &[(Emotion, f64)] = &[
    (Emotion::Confused, -0.3),
    (Emotion::Creative, 0.2),
    (Emotion::Thoughtful, 0.3),
    (Emotion::Helpless, -0.2),
];

const EMOTIONAL_STABILITY: &[(Emotion, f64)] = &[
    (Emotion::Anxious, -0.5),
    (Emotion::Depressed, -0.4),
    (Emotion::Angry, -0.3),
    (Emotion::Content, 0.4),
    (Emotion::Satisfied, 0.3),
    (Emotion::Helpless, -0.3),
    (Emotion::Guilty, -0.2),
    (Emotion::Ashamed, -0.2),
];

const DOMINANCE: &[(Emotion, f64)] = &[
    (Emotion::Proud, 0.3),
    (Emotion::Important, 0.3),
    (Emotion::Respected, 0.3),
    (Emotion::Submissive, -0.5),
    (Emotion::Helpless, -0.3),
    (Emotion::Insecure, -0.3),
    (Emotion::Hostile, 0.2),
    (Emotion::Critical, 0.2),
];

const HUMILITY: &[(Emotion, f64)] = &[
    (Emotion::Proud, -0.3),
    (Emotion::Important, -0.2),
    (Emotion::Appreciated, 0.2),
    (Emotion::Content, 0.2),
    (Emotion::Selfish, -0.4),
];

const LIVELINESS: &[(Emotion, f64)] = &[
    (Emotion::Excited, 0.4),
    (Emotion::Cheerful, 0.4),
    (Emotion::Energetic, 0.4),
    (Emotion::Hopeful, 0.3),
    (Emotion::Bored, -0.4),
    (Emotion::Apathetic, -0.4),
    (Emotion::Depressed, -0.3),
];

const RULE_CONSCIOUSNESS: &[(Emotion, f64)] = &[
    (Emotion::Guilty, 0.3),
    (Emotion::Ashamed, 0.2),
    (Emotion::Satisfied, 0.2),
    (Emotion::Faithful, 0.3),
    (Emotion::Selfish, -0.3),
];

const SOCIAL_BOLDNESS: &[(Emotion, f64)] = &[
    (Emotion::Rejected, -0.4),
    (Emotion::Insecure, -0.4),
    (Emotion::Submissive, -0.3),
    (Emotion::Excited, 0.2),
    (Emotion::Energetic, 0.2),
    (Emotion::Respected, 0.2),
    (Emotion::Lonely, -0.2),
];

const SENSITIVITY: &[(Emotion, f64)] = &[
    (Emotion::Loving, 0.3),
    (Emotion::Hurt, 0.3),
    (Emotion::Intimate, 0.3),
    (Emotion::Sensual, 0.3),
    (Emotion::Lonely, 0.2),
    (Emotion::Depressed, 0.2),
    (Emotion::Creative, 0.2),
];

const VIGILANCE: &[(Emotion, f64)] = &[
    (Emotion::Trusting, -0.5),
    (Emotion::Anxious, 0.3),
    (Emotion::Hostile, 0.2),
    (Emotion::Critical, 0.3),
    (Emotion::Insecure, 0.2),
];

const ABSTRACTEDNESS: &[(Emotion, f64)] = &[
    (Emotion::Creative, 0.4),
    (Emotion::Thoughtful, 0.3),
    (Emotion::Confused, 0.2),
    (Emotion::Bored, -0.2),
];

const PRIVATENESS: &[(Emotion, f64)] = &[
    (Emotion::Intimate, -0.3),
    (Emotion::Trusting, -0.2),
    (Emotion::Insecure, 0.2),
    (Emotion::Lonely, 0.2),
];

const APPREHENSION: &[(Emotion, f64)] = &[
    (Emotion::Anxious, 0.4),
    (Emotion::Guilty, 0.3),
    (Emotion::Ashamed, 0.3),
    (Emotion::Insecure, 0.4),
    (Emotion::Helpless, 0.3),
    (Emotion::Content, -0.3),
    (Emotion::Satisfied, -0.3),
    (Emotion::Proud, -0.3),
];

const OPENNESS_TO_CHANGE: &[(Emotion, f64)] = &[
    (Emotion::Excited, 0.3),
    (Emotion::Creative, 0.3),
    (Emotion::Hopeful, 0.2),
    (Emotion::Anxious, 0.1),
    (Emotion::Bored, -0.3),
    (Emotion::Content, -0.1),
];

const SELF_RELIANCE: &[(Emotion, f64)] = &[
    (Emotion::Lonely, 0.2),
    (Emotion::Rejected, -0.2),
    (Emotion::Important, 0.2),
    (Emotion::Trusting, -0.2),
    (Emotion::Intimate, -0.2),
];

const PERFECTIONISM: &[(Emotion, f64)] = &[
    (Emotion::Satisfied, 0.2),
    (Emotion::Guilty, 0.2),
    (Emotion::Angry, 0.3),
    (Emotion::Critical, 0.3),
    (Emotion::Anxious, 0.2),
];

const TENSION: &[(Emotion, f64)] = &[
    (Emotion::Anxious, 0.4),
    (Emotion::Angry, 0.4),
    (Emotion::Hostile, 0.3),
    (Emotion::Content, -0.4),
    (Emotion::Energetic, 0.2),
];

/// The coefficient rows for a trait, in declaration order.
#[must_use]
pub fn trait_coefficients(trait_: PersonalityTrait) -> &'static [(Emotion, f64)] {
    match trait_ {
        PersonalityTrait::Warmth => WARMTH,
        PersonalityTrait::Reasoning => REASONING,
        PersonalityTrait::EmotionalStability => EMOTIONAL_STABILITY,
        PersonalityTrait::Dominance => DOMINANCE,
        PersonalityTrait::Humility => HUMILITY,
        PersonalityTrait::Liveliness => LIVELINESS,
        PersonalityTrait::RuleConsciousness => RULE_CONSCIOUSNESS,
        PersonalityTrait::SocialBoldness => SOCIAL_BOLDNESS,
        PersonalityTrait::Sensitivity => SENSITIVITY,
        PersonalityTrait::Vigilance => VIGILANCE,
        PersonalityTrait::Abstractedness => ABSTRACTEDNESS,
        PersonalityTrait::Privateness => PRIVATENESS,
        PersonalityTrait::Apprehension => APPREHENSION,
        PersonalityTrait::OpennessToChange => OPENNESS_TO_CHANGE,
        PersonalityTrait::SelfReliance => SELF_RELIANCE,
        PersonalityTrait::Perfectionism => PERFECTIONISM,
        PersonalityTrait::Tension => TENSION,
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// The coefficient for a trait–emotion pair, or 0.0 if unmapped.
#[must_use]
pub fn coefficient(trait_: PersonalityTrait, emotion: Emotion) -> f64 {
    trait_coefficients(trait_)
        .iter()
        .find(|(e, _)| *e == emotion)
        .map_or(0.0, |(_, w)| *w)
}

/// All emotions with a non-zero coefficient for this trait.
#[must_use]
pub fn affected_emotions(trait_: PersonalityTrait) -> Vec<Emotion> {
    trait_coefficients(trait_).iter().map(|(e, _)| *e).collect()
}

/// All traits affecting an emotion, with their coefficients.
#[must_use]
pub fn traits_affecting(emotion: Emotion) -> Vec<(PersonalityTrait, f64)> {
    PersonalityTrait::ALL
        .iter()
        .filter_map(|&t| {
            let w = coefficient(t, emotion);
            (w != 0.0).then_some((t, w))
        })
        .collect()
}

/// Combined modifier for an emotion under a trait profile:
/// `Σ trait_value × coefficient(trait, emotion)` over all traits.
///
/// Positive values amplify movement toward the emotion, negative values
/// dampen it. This is the multiplicative modulation input consumed by
/// [`EmotionalState::apply_trait_modulated_change`](crate::state::EmotionalState::apply_trait_modulated_change).
#[must_use]
pub fn emotion_modifier(traits: &TraitProfile, emotion: Emotion) -> f64 {
    PersonalityTrait::ALL
        .iter()
        .map(|&t| traits.get(t) * coefficient(t, emotion))
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_pairs_resolve() {
        assert!((coefficient(PersonalityTrait::Warmth, Emotion::Loving) - 0.4).abs() < 1e-9);
        assert!((coefficient(PersonalityTrait::Vigilance, Emotion::Trusting) + 0.5).abs() < 1e-9);
    }

    #[test]
    fn unmapped_pair_is_zero() {
        assert_eq!(coefficient(PersonalityTrait::Warmth, Emotion::Excited), 0.0);
    }

    #[test]
    fn affected_emotions_matches_table() {
        let emotions = affected_emotions(PersonalityTrait::Warmth);
        assert!(emotions.contains(&Emotion::Loving));
        assert!(emotions.contains(&Emotion::Hostile));
        assert_eq!(emotions.len(), 8);
    }

    #[test]
    fn traits_affecting_inverts_the_table() {
        let traits = traits_affecting(Emotion::Anxious);
        let names: Vec<PersonalityTrait> = traits.iter().map(|(t, _)| *t).collect();
        assert!(names.contains(&PersonalityTrait::EmotionalStability));
        assert!(names.contains(&PersonalityTrait::Apprehension));
        assert!(names.contains(&PersonalityTrait::Tension));
        for (t, w) in traits {
            assert!((coefficient(t, Emotion::Anxious) - w).abs() < 1e-9);
        }
    }

    #[test]
    fn modifier_sums_weighted_coefficients() {
        let mut traits = TraitProfile::new();
        traits.set(PersonalityTrait::Warmth, 0.9).unwrap();

        let modifier = emotion_modifier(&traits, Emotion::Loving);
        // warmth 0.9 * 0.4 + sensitivity 0.5 * 0.3
        assert!((modifier - (0.9 * 0.4 + 0.5 * 0.3)).abs() < 1e-9);
        assert!(modifier > 0.0);
    }

    #[test]
    fn all_weights_are_in_range() {
        for trait_ in PersonalityTrait::ALL {
            for (_, w) in trait_coefficients(trait_) {
                assert!((-1.0..=1.0).contains(w));
            }
        }
    }
}
