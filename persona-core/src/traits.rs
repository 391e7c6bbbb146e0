//! The fixed personality trait universe (16PF-derived plus humility) and
//! the per-individual [`TraitProfile`].
//!
//! Trait values range 0.0–1.0 with 0.5 as the population average. The
//! 17-name universe is fixed at compile time; only values are mutable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{PersonaError, Result};

/// Number of traits in the fixed universe.
pub const TRAIT_COUNT: usize = 17;

// ---------------------------------------------------------------------------
// Trait universe
// ---------------------------------------------------------------------------

/// One of the 17 fixed personality traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityTrait {
    /// Interpersonal warmth and attentiveness to others.
    Warmth,
    /// Abstract thinking and problem-solving ability.
    Reasoning,
    /// Emotional regulation and coping with stress.
    EmotionalStability,
    /// Assertiveness and desire to influence others.
    Dominance,
    /// Modesty and groundedness about achievements.
    Humility,
    /// Enthusiasm and spontaneity in interactions.
    Liveliness,
    /// Adherence to rules and conventional standards.
    RuleConsciousness,
    /// Comfort in social situations and with attention.
    SocialBoldness,
    /// Emotional sensitivity and aesthetic appreciation.
    Sensitivity,
    /// Suspiciousness and distrust of others.
    Vigilance,
    /// Orientation toward ideas vs. practical matters.
    Abstractedness,
    /// Guardedness about personal information.
    Privateness,
    /// Tendency toward worry and self-doubt.
    Apprehension,
    /// Comfort with change and new experiences.
    OpennessToChange,
    /// Preference for independence vs. group membership.
    SelfReliance,
    /// Organization and attention to detail.
    Perfectionism,
    /// Physical tension and frustration tolerance.
    Tension,
}

/// Cluster a trait belongs to, used for profile summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitCluster {
    /// Traits related to interpersonal behavior and relationships.
    Interpersonal,
    /// Traits related to emotional regulation and reactivity.
    Emotional,
    /// Traits related to cognitive style and thinking patterns.
    Cognitive,
    /// Traits related to behavioral tendencies and self-management.
    Behavioral,
}

impl PersonalityTrait {
    /// All 17 traits in canonical declaration order.
    pub const ALL: [Self; TRAIT_COUNT] = [
        Self::Warmth,
        Self::Reasoning,
        Self::EmotionalStability,
        Self::Dominance,
        Self::Humility,
        Self::Liveliness,
        Self::RuleConsciousness,
        Self::SocialBoldness,
        Self::Sensitivity,
        Self::Vigilance,
        Self::Abstractedness,
        Self::Privateness,
        Self::Apprehension,
        Self::OpennessToChange,
        Self::SelfReliance,
        Self::Perfectionism,
        Self::Tension,
    ];

    /// Index of this trait in the canonical order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase snake-case name of the trait.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Warmth => "warmth",
            Self::Reasoning => "reasoning",
            Self::EmotionalStability => "emotional_stability",
            Self::Dominance => "dominance",
            Self::Humility => "humility",
            Self::Liveliness => "liveliness",
            Self::RuleConsciousness => "rule_consciousness",
            Self::SocialBoldness => "social_boldness",
            Self::Sensitivity => "sensitivity",
            Self::Vigilance => "vigilance",
            Self::Abstractedness => "abstractedness",
            Self::Privateness => "privateness",
            Self::Apprehension => "apprehension",
            Self::OpennessToChange => "openness_to_change",
            Self::SelfReliance => "self_reliance",
            Self::Perfectionism => "perfectionism",
            Self::Tension => "tension",
        }
    }

    /// What the trait measures.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Warmth => "Interpersonal warmth and attentiveness to others",
            Self::Reasoning => "Abstract thinking and problem-solving ability",
            Self::EmotionalStability => "Emotional regulation and coping with stress",
            Self::Dominance => "Assertiveness and desire to influence others",
            Self::Humility => "Modesty and groundedness about achievements",
            Self::Liveliness => "Enthusiasm and spontaneity in interactions",
            Self::RuleConsciousness => "Adherence to rules and conventional standards",
            Self::SocialBoldness => "Comfort in social situations and with attention",
            Self::Sensitivity => "Emotional sensitivity and aesthetic appreciation",
            Self::Vigilance => "Suspiciousness and distrust of others",
            Self::Abstractedness => "Orientation toward ideas vs. practical matters",
            Self::Privateness => "Guardedness about personal information",
            Self::Apprehension => "Tendency toward worry and self-doubt",
            Self::OpennessToChange => "Comfort with change and new experiences",
            Self::SelfReliance => "Preference for independence vs. group membership",
            Self::Perfectionism => "Organization and attention to detail",
            Self::Tension => "Physical tension and frustration tolerance",
        }
    }

    /// Description of low scores on this trait.
    #[must_use]
    pub const fn low_pole(self) -> &'static str {
        match self {
            Self::Warmth => "Reserved, impersonal, distant",
            Self::Reasoning => "Concrete thinking",
            Self::EmotionalStability => "Reactive, emotionally changeable",
            Self::Dominance => "Deferential, cooperative",
            Self::Humility => "Self-assured, confident",
            Self::Liveliness => "Serious, restrained, careful",
            Self::RuleConsciousness => "Expedient, nonconforming",
            Self::SocialBoldness => "Shy, threat-sensitive, timid",
            Self::Sensitivity => "Utilitarian, objective",
            Self::Vigilance => "Trusting, unsuspecting",
            Self::Abstractedness => "Grounded, practical",
            Self::Privateness => "Forthright, genuine, artless",
            Self::Apprehension => "Self-assured, unworried",
            Self::OpennessToChange => "Traditional, attached to familiar",
            Self::SelfReliance => "Group-oriented, affiliative",
            Self::Perfectionism => "Tolerates disorder, flexible",
            Self::Tension => "Relaxed, placid, patient",
        }
    }

    /// Description of high scores on this trait.
    #[must_use]
    pub const fn high_pole(self) -> &'static str {
        match self {
            Self::Warmth => "Warm, outgoing, attentive",
            Self::Reasoning => "Abstract thinking",
            Self::EmotionalStability => "Emotionally stable, adaptive",
            Self::Dominance => "Dominant, forceful, assertive",
            Self::Humility => "Humble, modest, unassuming",
            Self::Liveliness => "Lively, animated, spontaneous",
            Self::RuleConsciousness => "Rule-conscious, dutiful",
            Self::SocialBoldness => "Socially bold, venturesome",
            Self::Sensitivity => "Sensitive, aesthetic, sentimental",
            Self::Vigilance => "Vigilant, suspicious, skeptical",
            Self::Abstractedness => "Abstracted, imaginative",
            Self::Privateness => "Private, discreet, non-disclosing",
            Self::Apprehension => "Apprehensive, self-doubting",
            Self::OpennessToChange => "Open to change, experimenting",
            Self::SelfReliance => "Self-reliant, solitary",
            Self::Perfectionism => "Perfectionist, organized",
            Self::Tension => "Tense, high energy, impatient",
        }
    }

    /// Which cluster this trait falls into.
    #[must_use]
    pub const fn cluster(self) -> TraitCluster {
        match self {
            Self::Warmth
            | Self::Dominance
            | Self::SocialBoldness
            | Self::Sensitivity
            | Self::Privateness => TraitCluster::Interpersonal,
            Self::EmotionalStability | Self::Apprehension | Self::Tension | Self::Vigilance => {
                TraitCluster::Emotional
            }
            Self::Reasoning | Self::Abstractedness | Self::OpennessToChange => {
                TraitCluster::Cognitive
            }
            Self::Liveliness
            | Self::RuleConsciousness
            | Self::Perfectionism
            | Self::SelfReliance
            | Self::Humility => TraitCluster::Behavioral,
        }
    }

    /// Parse a trait from its snake-case name.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::TraitNotFound`] for an unrecognized name;
    /// the error message lists the valid universe.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| PersonaError::TraitNotFound {
                name: name.to_string(),
                universe: trait_universe(),
            })
    }
}

impl fmt::Display for PersonalityTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comma-separated list of all trait names, for error messages.
#[must_use]
pub fn trait_universe() -> String {
    PersonalityTrait::ALL
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// TraitProfile
// ---------------------------------------------------------------------------

/// The personality trait configuration of an individual.
///
/// Each trait value ranges 0.0 (low pole) to 1.0 (high pole); 0.5 is the
/// population average and the default baseline. The trait universe is
/// fixed — only values change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitProfile {
    values: [f64; TRAIT_COUNT],
}

impl TraitProfile {
    /// Create a profile with every trait at the population average (0.5).
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: [0.5; TRAIT_COUNT],
        }
    }

    /// Create a profile with every trait at `baseline`.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `baseline` is outside
    /// `[0.0, 1.0]`.
    pub fn with_baseline(baseline: f64) -> Result<Self> {
        validate_trait_value("baseline", baseline)?;
        Ok(Self {
            values: [baseline; TRAIT_COUNT],
        })
    }

    /// Get the current value of a trait.
    #[must_use]
    pub fn get(&self, trait_: PersonalityTrait) -> f64 {
        self.values[trait_.index()]
    }

    /// Get a trait value by name.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::TraitNotFound`] for an unknown name.
    pub fn get_by_name(&self, name: &str) -> Result<f64> {
        Ok(self.get(PersonalityTrait::from_name(name)?))
    }

    /// Set the value of a single trait.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `value` is outside
    /// `[0.0, 1.0]`.
    pub fn set(&mut self, trait_: PersonalityTrait, value: f64) -> Result<()> {
        validate_trait_value(trait_.name(), value)?;
        self.values[trait_.index()] = value;
        Ok(())
    }

    /// Set multiple traits at once. All values are validated before any is
    /// applied, so a failed call leaves the profile unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if any value is outside
    /// `[0.0, 1.0]`.
    pub fn set_many(&mut self, updates: &[(PersonalityTrait, f64)]) -> Result<()> {
        for (trait_, value) in updates {
            validate_trait_value(trait_.name(), *value)?;
        }
        for (trait_, value) in updates {
            self.values[trait_.index()] = *value;
        }
        Ok(())
    }

    /// Traits at or above `threshold`, sorted by value descending.
    #[must_use]
    pub fn high(&self, threshold: f64) -> Vec<(PersonalityTrait, f64)> {
        let mut out: Vec<(PersonalityTrait, f64)> = PersonalityTrait::ALL
            .iter()
            .map(|&t| (t, self.get(t)))
            .filter(|(_, v)| *v >= threshold)
            .collect();
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        out
    }

    /// Traits at or below `threshold`, sorted by value ascending.
    #[must_use]
    pub fn low(&self, threshold: f64) -> Vec<(PersonalityTrait, f64)> {
        let mut out: Vec<(PersonalityTrait, f64)> = PersonalityTrait::ALL
            .iter()
            .map(|&t| (t, self.get(t)))
            .filter(|(_, v)| *v <= threshold)
            .collect();
        out.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        out
    }

    /// Mean absolute deviation from the population average (0.5) across
    /// all 17 traits.
    #[must_use]
    pub fn deviation_from_average(&self) -> f64 {
        let total: f64 = self.values.iter().map(|v| (v - 0.5).abs()).sum();
        total / TRAIT_COUNT as f64
    }

    /// Blend with another profile: each value becomes
    /// `self * (1 - weight) + other * weight`.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `weight` is outside
    /// `[0.0, 1.0]`.
    pub fn blend(&self, other: &Self, weight: f64) -> Result<Self> {
        validate_trait_value("weight", weight)?;
        let mut values = [0.0; TRAIT_COUNT];
        for (i, slot) in values.iter_mut().enumerate() {
            *slot = self.values[i] * (1.0 - weight) + other.values[i] * weight;
        }
        Ok(Self { values })
    }

    /// Whether the maximum per-trait absolute difference to `other` is at
    /// most `threshold`.
    #[must_use]
    pub fn is_similar(&self, other: &Self, threshold: f64) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(a, b)| (a - b).abs() <= threshold)
    }

    /// Snapshot contract: name → value map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        PersonalityTrait::ALL
            .iter()
            .map(|&t| (t.name().to_string(), self.get(t)))
            .collect()
    }

    /// Build a profile from a name → value map. Traits missing from the
    /// map stay at the 0.5 baseline.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::TraitNotFound`] for unknown names and
    /// [`PersonaError::OutOfRange`] for out-of-range values.
    pub fn from_map(map: &BTreeMap<String, f64>) -> Result<Self> {
        let mut profile = Self::new();
        for (name, value) in map {
            let trait_ = PersonalityTrait::from_name(name)?;
            profile.set(trait_, *value)?;
        }
        Ok(profile)
    }

    /// Iterate over `(trait, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (PersonalityTrait, f64)> + '_ {
        PersonalityTrait::ALL.iter().map(|&t| (t, self.get(t)))
    }
}

impl Default for TraitProfile {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_trait_value(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PersonaError::OutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
