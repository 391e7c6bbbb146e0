//! Masks — contextual emotional overlays.
//!
//! A mask modifies emotional *expression* for a situation without touching
//! the underlying state: [`Mask::apply`] returns a derived copy. Masks are
//! applied at read time and never persisted into the state itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::emotion::Emotion;
use crate::error::{PersonaError, Result};
use crate::state::EmotionalState;

/// A named emotional overlay activated by situational keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    /// Human-readable name for the mask.
    pub name: String,
    /// Additive changes to apply per emotion, each in `[-1.0, 1.0]`.
    pub emotional_modifications: BTreeMap<Emotion, f64>,
    /// Keywords whose presence in a situation activates this mask.
    pub trigger_situations: Vec<String>,
    /// Whether the mask is active without any keyword match.
    pub active_by_default: bool,
    /// Optional description of the mask's purpose.
    #[serde(default)]
    pub description: String,
}

impl Mask {
    /// Create a mask, validating every modification into `[-1.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] for a modification outside
    /// `[-1.0, 1.0]`.
    pub fn new(
        name: impl Into<String>,
        emotional_modifications: BTreeMap<Emotion, f64>,
        trigger_situations: Vec<String>,
    ) -> Result<Self> {
        for (emotion, value) in &emotional_modifications {
            if !(-1.0..=1.0).contains(value) {
                return Err(PersonaError::OutOfRange {
                    field: format!("modification for '{emotion}'"),
                    value: *value,
                });
            }
        }
        Ok(Self {
            name: name.into(),
            emotional_modifications,
            trigger_situations,
            active_by_default: false,
            description: String::new(),
        })
    }

    /// Builder-style description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder-style default activation.
    #[must_use]
    pub fn with_active_by_default(mut self, active: bool) -> Self {
        self.active_by_default = active;
        self
    }

    /// Apply this mask to an emotional state, returning a derived copy.
    ///
    /// Each modification adds to the corresponding emotion and the result
    /// is clamped to `[0.0, 1.0]`. The input state is never mutated;
    /// untracked emotions are left alone.
    #[must_use]
    pub fn apply(&self, state: &EmotionalState) -> EmotionalState {
        let deltas: Vec<(Emotion, f64)> = self
            .emotional_modifications
            .iter()
            .map(|(e, d)| (*e, *d))
            .collect();
        let mut masked = state.clone();
        masked.apply_delta(&deltas, 1.0);
        masked
    }

    /// Whether this mask should activate for the given situation text.
    ///
    /// True when the mask is active by default, or when any trigger
    /// keyword is a case-insensitive substring of `situation_text`.
    #[must_use]
    pub fn should_trigger(&self, situation_text: &str) -> bool {
        if self.active_by_default {
            return true;
        }
        let lowered = situation_text.to_lowercase();
        self.trigger_situations
            .iter()
            .any(|kw| lowered.contains(&kw.to_lowercase()))
    }

    /// The modification for a specific emotion, or 0.0 if unspecified.
    #[must_use]
    pub fn modification(&self, emotion: Emotion) -> f64 {
        self.emotional_modifications
            .get(&emotion)
            .copied()
            .unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Preset masks
// ---------------------------------------------------------------------------

fn preset(
    name: &str,
    description: &str,
    modifications: &[(Emotion, f64)],
    keywords: &[&str],
) -> Mask {
    // Preset tables are static and in range, so construction cannot fail.
    Mask::new(
        name,
        modifications.iter().copied().collect(),
        keywords.iter().map(|s| (*s).to_string()).collect(),
    )
    .map(|m| m.with_description(description))
    .unwrap_or_else(|_| Mask {
        name: name.to_string(),
        emotional_modifications: BTreeMap::new(),
        trigger_situations: Vec::new(),
        active_by_default: false,
        description: description.to_string(),
    })
}

/// Workplace persona: suppresses strong emotional displays and promotes
/// calm, composed behavior.
#[must_use]
pub fn professional_mask() -> Mask {
    preset(
        "professional",
        "Workplace persona that suppresses strong emotions and promotes \
         calm, composed behavior suitable for professional environments.",
        &[
            (Emotion::Angry, -0.5),
            (Emotion::Hostile, -0.5),
            (Emotion::Hateful, -0.6),
            (Emotion::Critical, -0.3),
            (Emotion::Excited, -0.3),
            (Emotion::Content, 0.2),
            (Emotion::Satisfied, 0.2),
            (Emotion::Thoughtful, 0.3),
        ],
        &[
            "office",
            "meeting",
            "professional",
            "work",
            "conference",
            "presentation",
            "interview",
            "client",
            "boss",
            "colleague",
        ],
    )
}

/// Relaxed persona for informal social situations.
#[must_use]
pub fn casual_mask() -> Mask {
    preset(
        "casual",
        "Relaxed persona for informal social situations that allows more \
         natural emotional expression.",
        &[
            (Emotion::Excited, 0.2),
            (Emotion::Cheerful, 0.2),
            (Emotion::Energetic, 0.2),
            (Emotion::Insecure, -0.2),
            (Emotion::Anxious, -0.2),
            (Emotion::Loving, 0.1),
            (Emotion::Trusting, 0.2),
        ],
        &[
            "party",
            "friends",
            "casual",
            "hanging out",
            "relaxing",
            "weekend",
            "bar",
            "pub",
            "home",
            "vacation",
        ],
    )
}

/// Calm, unflappable persona for crisis situations.
#[must_use]
pub fn stoic_mask() -> Mask {
    preset(
        "stoic",
        "Calm, unflappable persona for crisis situations that suppresses \
         emotional reactivity and promotes rational, measured responses.",
        &[
            (Emotion::Angry, -0.6),
            (Emotion::Anxious, -0.5),
            (Emotion::Helpless, -0.4),
            (Emotion::Confused, -0.3),
            (Emotion::Insecure, -0.4),
            (Emotion::Excited, -0.4),
            (Emotion::Depressed, -0.3),
            (Emotion::Lonely, -0.2),
            (Emotion::Content, 0.3),
            (Emotion::Thoughtful, 0.4),
            (Emotion::Satisfied, 0.2),
        ],
        &[
            "crisis",
            "emergency",
            "danger",
            "high stakes",
            "stressful",
            "pressure",
            "urgent",
            "critical",
            "life or death",
        ],
    )
}

/// High-energy persona for motivational contexts.
#[must_use]
pub fn enthusiastic_mask() -> Mask {
    preset(
        "enthusiastic",
        "High-energy persona for motivational contexts that amplifies \
         positive emotions and enthusiasm.",
        &[
            (Emotion::Excited, 0.4),
            (Emotion::Cheerful, 0.4),
            (Emotion::Hopeful, 0.3),
            (Emotion::Energetic, 0.5),
            (Emotion::Creative, 0.3),
            (Emotion::Bored, -0.4),
            (Emotion::Apathetic, -0.5),
            (Emotion::Depressed, -0.3),
            (Emotion::Lonely, -0.2),
            (Emotion::Proud, 0.2),
            (Emotion::Important, 0.2),
        ],
        &[
            "rally",
            "motivational",
            "celebration",
            "achievement",
            "success",
            "launch",
            "opening",
            "kickoff",
            "pep talk",
            "inspiring",
        ],
    )
}

/// Caring, supportive persona for caretaking situations.
#[must_use]
pub fn nurturing_mask() -> Mask {
    preset(
        "nurturing",
        "Caring, supportive persona for caretaking situations that promotes \
         warmth, patience, and empathy.",
        &[
            (Emotion::Loving, 0.4),
            (Emotion::Nurturing, 0.5),
            (Emotion::Intimate, 0.3),
            (Emotion::Trusting, 0.3),
            (Emotion::Angry, -0.4),
            (Emotion::Critical, -0.4),
            (Emotion::Hostile, -0.5),
            (Emotion::Selfish, -0.5),
            (Emotion::Content, 0.2),
            (Emotion::Satisfied, 0.2),
        ],
        &[
            "child",
            "children",
            "baby",
            "caring",
            "nursing",
            "teaching",
            "mentoring",
            "comforting",
            "supporting",
            "vulnerable",
        ],
    )
}

/// Protective persona for unfamiliar or potentially hostile situations.
#[must_use]
pub fn guarded_mask() -> Mask {
    preset(
        "guarded",
        "Protective persona for unfamiliar or potentially hostile situations \
         that reduces trust and increases vigilance.",
        &[
            (Emotion::Trusting, -0.4),
            (Emotion::Intimate, -0.5),
            (Emotion::Loving, -0.3),
            (Emotion::Anxious, 0.2),
            (Emotion::Insecure, 0.2),
            (Emotion::Cheerful, -0.2),
            (Emotion::Excited, -0.2),
            (Emotion::Content, 0.1),
            (Emotion::Thoughtful, 0.2),
        ],
        &[
            "stranger",
            "unfamiliar",
            "suspicious",
            "unknown",
            "new place",
            "first time",
            "wary",
            "cautious",
        ],
    )
}

/// All predefined masks.
#[must_use]
pub fn default_masks() -> Vec<Mask> {
    vec![
        professional_mask(),
        casual_mask(),
        stoic_mask(),
        enthusiastic_mask(),
        nurturing_mask(),
        guarded_mask(),
    ]
}

/// Look up a predefined mask by name (case-insensitive).
#[must_use]
pub fn mask_by_name(name: &str) -> Option<Mask> {
    default_masks()
        .into_iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
