//! Structured situational context — categorized facts with per-category
//! embedding weights.
//!
//! Facts arrive from an external fact-extraction collaborator and are
//! never validated beyond category membership. The per-category weights
//! order the generated embedding text so that high-weight categories
//! (location, social) dominate the similarity signal over low-weight ones
//! (economic).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Categories of situational facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactCategory {
    /// Physical location and venue details.
    Location,
    /// Environmental and atmospheric conditions.
    Environment,
    /// Time-related contextual information.
    Temporal,
    /// Social dynamics and interpersonal context.
    Social,
    /// Physical conditions and measurements.
    Physical,
    /// Observable behaviors and patterns.
    Behavioral,
    /// Economic and transactional factors.
    Economic,
    /// Sensory perceptions and experiences.
    Sensory,
}

impl FactCategory {
    /// All categories.
    pub const ALL: [Self; 8] = [
        Self::Location,
        Self::Environment,
        Self::Temporal,
        Self::Social,
        Self::Physical,
        Self::Behavioral,
        Self::Economic,
        Self::Sensory,
    ];

    /// Lowercase name of the category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Environment => "environment",
            Self::Temporal => "temporal",
            Self::Social => "social",
            Self::Physical => "physical",
            Self::Behavioral => "behavioral",
            Self::Economic => "economic",
            Self::Sensory => "sensory",
        }
    }

    /// Relative weight for embedding generation. Higher-weight categories
    /// are more important for distinguishing situations.
    #[must_use]
    pub const fn embedding_weight(self) -> f64 {
        match self {
            Self::Location => 1.0,
            Self::Environment => 0.8,
            Self::Temporal => 0.7,
            Self::Social => 0.9,
            Self::Physical => 0.6,
            Self::Behavioral => 0.8,
            Self::Economic => 0.5,
            Self::Sensory => 0.7,
        }
    }
}

impl fmt::Display for FactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single situational fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Category of the fact.
    pub category: FactCategory,
    /// Short identifier for the fact type.
    pub key: String,
    /// The fact value (string, number, bool, ...).
    pub value: Value,
    /// Optional unit of measurement (e.g. "people", "percent").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Confidence in the fact's accuracy, `[0.0, 1.0]`.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl Fact {
    /// Create a fact with full confidence.
    #[must_use]
    pub fn new(category: FactCategory, key: impl Into<String>, value: Value) -> Self {
        Self {
            category,
            key: key.into(),
            value,
            unit: None,
            confidence: 1.0,
        }
    }

    /// Builder-style unit.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Builder-style confidence (clamped to `[0.0, 1.0]`).
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Render this fact as embedding text, e.g. `"queue_length: 5 people"`.
    #[must_use]
    pub fn to_embedding_text(&self) -> String {
        let value = match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match &self.unit {
            Some(unit) => format!("{}: {value} {unit}", self.key),
            None => format!("{}: {value}", self.key),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_embedding_text())
    }
}

/// A collection of facts describing one situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SituationalContext {
    /// Facts in insertion order.
    pub facts: Vec<Fact>,
    /// When this context was captured.
    pub timestamp: DateTime<Utc>,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SituationalContext {
    /// Create an empty context stamped now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            facts: Vec::new(),
            timestamp: Utc::now(),
            description: None,
        }
    }

    /// Builder-style description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an arbitrary fact.
    pub fn add_fact(&mut self, fact: Fact) {
        self.facts.push(fact);
    }

    /// Add a string-valued fact.
    pub fn add_text(
        &mut self,
        category: FactCategory,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.facts
            .push(Fact::new(category, key, Value::String(value.into())));
    }

    /// Add a numeric fact with an optional unit.
    pub fn add_numeric(
        &mut self,
        category: FactCategory,
        key: impl Into<String>,
        value: f64,
        unit: Option<&str>,
    ) {
        let mut fact = Fact::new(
            category,
            key,
            serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number),
        );
        if let Some(unit) = unit {
            fact = fact.with_unit(unit);
        }
        self.facts.push(fact);
    }

    /// Facts in a specific category, in insertion order.
    #[must_use]
    pub fn facts_by_category(&self, category: FactCategory) -> Vec<&Fact> {
        self.facts
            .iter()
            .filter(|f| f.category == category)
            .collect()
    }

    /// The first fact with the given key.
    #[must_use]
    pub fn get_fact(&self, key: &str) -> Option<&Fact> {
        self.facts.iter().find(|f| f.key == key)
    }

    /// The first value for the given key.
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.get_fact(key).map(|f| &f.value)
    }

    /// Numeric lookup for trigger rules. Accepts either a bare key or a
    /// `category.key` dotted path; non-numeric values yield `None`.
    #[must_use]
    pub fn numeric_value(&self, field: &str) -> Option<f64> {
        match field.split_once('.') {
            Some((category, key)) => self
                .facts
                .iter()
                .find(|f| f.category.name() == category && f.key == key)
                .and_then(|f| f.value.as_f64()),
            None => self.get_value(field).and_then(Value::as_f64),
        }
    }

    /// Generate embedding text: one line per fact, ordered by descending
    /// category weight then key, so higher-weight categories lead the
    /// text and dominate the similarity signal.
    #[must_use]
    pub fn to_embedding_text(&self) -> String {
        let mut sorted: Vec<&Fact> = self.facts.iter().collect();
        sorted.sort_by(|a, b| {
            b.category
                .embedding_weight()
                .partial_cmp(&a.category.embedding_weight())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key))
        });
        sorted
            .iter()
            .map(|f| f.to_embedding_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Weighted `(text, weight)` pairs for weighted embedding generation.
    #[must_use]
    pub fn to_weighted_pairs(&self) -> Vec<(String, f64)> {
        self.facts
            .iter()
            .map(|f| (f.to_embedding_text(), f.category.embedding_weight()))
            .collect()
    }

    /// Merge two contexts into a new one: facts from both, the earlier
    /// timestamp, the first available description.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut facts = self.facts.clone();
        facts.extend(other.facts.iter().cloned());
        Self {
            facts,
            timestamp: self.timestamp.min(other.timestamp),
            description: self.description.clone().or_else(|| other.description.clone()),
        }
    }

    /// Number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether the context holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl Default for SituationalContext {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
