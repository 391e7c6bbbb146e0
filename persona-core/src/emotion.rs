//! The fixed emotion universe: 36 named emotions in 6 categories.
//!
//! The universe never changes at runtime. Declaration order below is
//! canonical — `dominant()` and `top_n()` tie-breaks, map iteration and
//! serialized snapshots all follow it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PersonaError;

/// Number of emotions in the fixed universe.
pub const EMOTION_COUNT: usize = 36;

/// Number of emotion categories.
pub const CATEGORY_COUNT: usize = 6;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Major emotional category classification.
///
/// Each of the 36 emotions belongs to exactly one category. Categories
/// carry fixed valence and arousal constants used by the aggregate
/// [`valence`](crate::state::EmotionalState::valence) and
/// [`arousal`](crate::state::EmotionalState::arousal) measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    /// Hostile, aggressive, and frustrated emotions.
    Anger,
    /// Depressive, lonely, and disengaged emotions.
    Sad,
    /// Anxious, insecure, and helpless emotions.
    Fear,
    /// Happy, energetic, and hopeful emotions.
    Joy,
    /// Confident, proud, and satisfied emotions.
    Powerful,
    /// Calm, loving, and trusting emotions.
    Peaceful,
}

impl EmotionCategory {
    /// All six categories in canonical order.
    pub const ALL: [Self; CATEGORY_COUNT] = [
        Self::Anger,
        Self::Sad,
        Self::Fear,
        Self::Joy,
        Self::Powerful,
        Self::Peaceful,
    ];

    /// Lowercase name of the category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Anger => "anger",
            Self::Sad => "sad",
            Self::Fear => "fear",
            Self::Joy => "joy",
            Self::Powerful => "powerful",
            Self::Peaceful => "peaceful",
        }
    }

    /// Human-readable description of the category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Anger => "Hostile, aggressive, and frustrated emotions",
            Self::Sad => "Depressive, lonely, and disengaged emotions",
            Self::Fear => "Anxious, insecure, and helpless emotions",
            Self::Joy => "Happy, energetic, and hopeful emotions",
            Self::Powerful => "Confident, proud, and satisfied emotions",
            Self::Peaceful => "Calm, loving, and trusting emotions",
        }
    }

    /// Whether this is a positive emotional category.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Joy | Self::Powerful | Self::Peaceful)
    }

    /// Whether this is a negative emotional category.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Anger | Self::Sad | Self::Fear)
    }

    /// Valence of the category, from -1.0 (very negative) to 1.0 (very
    /// positive).
    #[must_use]
    pub const fn valence(self) -> f64 {
        match self {
            Self::Anger => -0.8,
            Self::Sad => -0.6,
            Self::Fear => -0.7,
            Self::Joy => 0.9,
            Self::Powerful => 0.7,
            Self::Peaceful => 0.8,
        }
    }

    /// Arousal (activation level) of the category, from 0.0 (calm) to 1.0
    /// (highly activated).
    #[must_use]
    pub const fn arousal(self) -> f64 {
        match self {
            Self::Anger => 0.9,
            Self::Sad => 0.2,
            Self::Fear => 0.8,
            Self::Joy => 0.8,
            Self::Powerful => 0.6,
            Self::Peaceful => 0.2,
        }
    }

    /// The six emotions belonging to this category, in canonical order.
    #[must_use]
    pub fn emotions(self) -> &'static [Emotion] {
        let all: &'static [Emotion; EMOTION_COUNT] = &Emotion::ALL;
        let start = match self {
            Self::Anger => 0,
            Self::Sad => 6,
            Self::Fear => 12,
            Self::Joy => 18,
            Self::Powerful => 24,
            Self::Peaceful => 30,
        };
        &all[start..start + 6]
    }

    /// Parse a category from its lowercase name.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Validation`] for an unrecognized name.
    pub fn from_name(name: &str) -> crate::error::Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|c| c.name()).collect();
                PersonaError::Validation(format!(
                    "Invalid emotion category '{name}'. Valid options: {}",
                    valid.join(", ")
                ))
            })
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Emotions
// ---------------------------------------------------------------------------

/// One of the 36 fixed named emotions.
///
/// Declaration order is canonical: the first six variants form the Anger
/// category, the next six Sad, then Fear, Joy, Powerful, and Peaceful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    // Anger
    /// Feeling antagonistic or unfriendly toward others.
    Hostile,
    /// Feeling emotional pain from perceived mistreatment.
    Hurt,
    /// Feeling strong displeasure or hostility.
    Angry,
    /// Focused on one's own needs at expense of others.
    Selfish,
    /// Feeling intense dislike or ill will.
    Hateful,
    /// Inclined to find fault with others.
    Critical,
    // Sad
    /// Feeling responsible for wrongdoing or failure.
    Guilty,
    /// Feeling embarrassed about behavior or circumstances.
    Ashamed,
    /// Feeling deep sadness and lack of hope.
    Depressed,
    /// Feeling isolated or lacking meaningful connection.
    Lonely,
    /// Feeling uninterested or lacking stimulation.
    Bored,
    /// Feeling indifferent or lacking engagement.
    Apathetic,
    // Fear
    /// Feeling dismissed or unwanted by others.
    Rejected,
    /// Unable to understand or make sense of things.
    Confused,
    /// Inclined to yield to others' authority.
    Submissive,
    /// Uncertain about oneself or one's position.
    Insecure,
    /// Feeling worried about potential threats.
    Anxious,
    /// Feeling unable to act or help oneself.
    Helpless,
    // Joy
    /// Feeling eager anticipation or enthusiasm.
    Excited,
    /// Connected to physical pleasures and sensations.
    Sensual,
    /// Feeling full of vitality and vigor.
    Energetic,
    /// Feeling noticeably happy and optimistic.
    Cheerful,
    /// Feeling inspired and inventive.
    Creative,
    /// Feeling optimistic about future possibilities.
    Hopeful,
    // Powerful
    /// Satisfaction from achievements or qualities.
    Proud,
    /// Feeling valued and admired by others.
    Respected,
    /// Recognized and valued for contributions.
    Appreciated,
    /// Feeling significant and consequential.
    Important,
    /// Loyal and devoted to beliefs or relationships.
    Faithful,
    /// Feeling content with outcomes.
    Satisfied,
    // Peaceful
    /// Peacefully satisfied with things as they are.
    Content,
    /// Feeling reflective and considerate.
    Thoughtful,
    /// Closely connected and personal with others.
    Intimate,
    /// Feeling deep affection and care for others.
    Loving,
    /// Confident in the reliability of others.
    Trusting,
    /// Caring and supportive toward others' growth.
    Nurturing,
}

impl Emotion {
    /// All 36 emotions in canonical declaration order.
    pub const ALL: [Self; EMOTION_COUNT] = [
        Self::Hostile,
        Self::Hurt,
        Self::Angry,
        Self::Selfish,
        Self::Hateful,
        Self::Critical,
        Self::Guilty,
        Self::Ashamed,
        Self::Depressed,
        Self::Lonely,
        Self::Bored,
        Self::Apathetic,
        Self::Rejected,
        Self::Confused,
        Self::Submissive,
        Self::Insecure,
        Self::Anxious,
        Self::Helpless,
        Self::Excited,
        Self::Sensual,
        Self::Energetic,
        Self::Cheerful,
        Self::Creative,
        Self::Hopeful,
        Self::Proud,
        Self::Respected,
        Self::Appreciated,
        Self::Important,
        Self::Faithful,
        Self::Satisfied,
        Self::Content,
        Self::Thoughtful,
        Self::Intimate,
        Self::Loving,
        Self::Trusting,
        Self::Nurturing,
    ];

    /// Index of this emotion in the canonical order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name of the emotion.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hostile => "hostile",
            Self::Hurt => "hurt",
            Self::Angry => "angry",
            Self::Selfish => "selfish",
            Self::Hateful => "hateful",
            Self::Critical => "critical",
            Self::Guilty => "guilty",
            Self::Ashamed => "ashamed",
            Self::Depressed => "depressed",
            Self::Lonely => "lonely",
            Self::Bored => "bored",
            Self::Apathetic => "apathetic",
            Self::Rejected => "rejected",
            Self::Confused => "confused",
            Self::Submissive => "submissive",
            Self::Insecure => "insecure",
            Self::Anxious => "anxious",
            Self::Helpless => "helpless",
            Self::Excited => "excited",
            Self::Sensual => "sensual",
            Self::Energetic => "energetic",
            Self::Cheerful => "cheerful",
            Self::Creative => "creative",
            Self::Hopeful => "hopeful",
            Self::Proud => "proud",
            Self::Respected => "respected",
            Self::Appreciated => "appreciated",
            Self::Important => "important",
            Self::Faithful => "faithful",
            Self::Satisfied => "satisfied",
            Self::Content => "content",
            Self::Thoughtful => "thoughtful",
            Self::Intimate => "intimate",
            Self::Loving => "loving",
            Self::Trusting => "trusting",
            Self::Nurturing => "nurturing",
        }
    }

    /// The category this emotion belongs to.
    #[must_use]
    pub const fn category(self) -> EmotionCategory {
        match self.index() / 6 {
            0 => EmotionCategory::Anger,
            1 => EmotionCategory::Sad,
            2 => EmotionCategory::Fear,
            3 => EmotionCategory::Joy,
            4 => EmotionCategory::Powerful,
            _ => EmotionCategory::Peaceful,
        }
    }

    /// Parse an emotion from its lowercase name.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::EmotionNotFound`] for an unrecognized name;
    /// the error message lists the valid universe.
    pub fn from_name(name: &str) -> crate::error::Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name() == name)
            .ok_or_else(|| PersonaError::EmotionNotFound {
                name: name.to_string(),
                universe: emotion_universe(),
            })
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comma-separated list of all emotion names, for error messages.
#[must_use]
pub fn emotion_universe() -> String {
    Emotion::ALL
        .iter()
        .map(|e| e.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// All emotions from positive categories (joy, powerful, peaceful).
#[must_use]
pub fn positive_emotions() -> Vec<Emotion> {
    Emotion::ALL
        .iter()
        .copied()
        .filter(|e| e.category().is_positive())
        .collect()
}

/// All emotions from negative categories (anger, sad, fear).
#[must_use]
pub fn negative_emotions() -> Vec<Emotion> {
    Emotion::ALL
        .iter()
        .copied()
        .filter(|e| e.category().is_negative())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universe_has_36_emotions_in_6_categories() {
        assert_eq!(Emotion::ALL.len(), 36);
        for category in EmotionCategory::ALL {
            assert_eq!(category.emotions().len(), 6);
            for emotion in category.emotions() {
                assert_eq!(emotion.category(), category);
            }
        }
    }

    #[test]
    fn index_matches_declaration_order() {
        for (i, emotion) in Emotion::ALL.iter().enumerate() {
            assert_eq!(emotion.index(), i);
        }
    }

    #[test]
    fn name_round_trips() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::from_name(emotion.name()).unwrap(), emotion);
        }
    }

    #[test]
    fn unknown_name_lists_universe() {
        let err = Emotion::from_name("happiness").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("happiness"));
        assert!(message.contains("anxious"));
        assert!(message.contains("nurturing"));
    }

    #[test]
    fn category_lookup_matches_source_taxonomy() {
        assert_eq!(Emotion::Anxious.category(), EmotionCategory::Fear);
        assert_eq!(Emotion::Hopeful.category(), EmotionCategory::Joy);
        assert_eq!(Emotion::Hostile.category(), EmotionCategory::Anger);
        assert_eq!(Emotion::Nurturing.category(), EmotionCategory::Peaceful);
        assert_eq!(Emotion::Satisfied.category(), EmotionCategory::Powerful);
        assert_eq!(Emotion::Apathetic.category(), EmotionCategory::Sad);
    }

    #[test]
    fn positive_and_negative_partition_the_universe() {
        let positive = positive_emotions();
        let negative = negative_emotions();
        assert_eq!(positive.len() + negative.len(), 36);
        assert!(positive.contains(&Emotion::Hopeful));
        assert!(!positive.contains(&Emotion::Anxious));
        assert!(negative.contains(&Emotion::Anxious));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Emotion::Anxious).unwrap();
        assert_eq!(json, "\"anxious\"");
        let back: Emotion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Emotion::Anxious);
    }
}
