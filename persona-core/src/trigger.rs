//! Triggers — rule-based activators over emotional state or situational
//! context.
//!
//! `check` is an idempotent predicate and never mutates anything; only
//! `fire` produces a (derived) new state. Each evaluation cycle a trigger
//! passes through inactive → checking → fired and back — there is no
//! retained state between cycles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::SituationalContext;
use crate::emotion::Emotion;
use crate::error::Result;
use crate::mask::Mask;
use crate::state::EmotionalState;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Comparison operator for trigger rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerOp {
    /// Strictly greater than.
    #[serde(rename = ">")]
    Gt,
    /// Strictly less than.
    #[serde(rename = "<")]
    Lt,
    /// Greater than or equal.
    #[serde(rename = ">=")]
    Ge,
    /// Less than or equal.
    #[serde(rename = "<=")]
    Le,
    /// Equal.
    #[serde(rename = "==")]
    Eq,
    /// Not equal.
    #[serde(rename = "!=")]
    Ne,
}

impl TriggerOp {
    /// Evaluate `value <op> threshold`.
    #[must_use]
    pub fn evaluate(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Lt => value < threshold,
            Self::Ge => value >= threshold,
            Self::Le => value <= threshold,
            Self::Eq => value == threshold,
            Self::Ne => value != threshold,
        }
    }
}

/// A single threshold rule over an emotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionRule {
    /// The emotion to monitor.
    pub emotion: Emotion,
    /// Comparison operator.
    pub op: TriggerOp,
    /// Threshold value.
    pub threshold: f64,
}

impl EmotionRule {
    /// Create a rule.
    #[must_use]
    pub fn new(emotion: Emotion, op: TriggerOp, threshold: f64) -> Self {
        Self {
            emotion,
            op,
            threshold,
        }
    }
}

/// A single threshold rule over a situational field.
///
/// The field supports dotted paths into nested fact maps
/// (e.g. `"environment.noise_level"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Field name or dotted path.
    pub field: String,
    /// Comparison operator.
    pub op: TriggerOp,
    /// Threshold value.
    pub threshold: f64,
}

impl FieldRule {
    /// Create a rule.
    #[must_use]
    pub fn new(field: impl Into<String>, op: TriggerOp, threshold: f64) -> Self {
        Self {
            field: field.into(),
            op,
            threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// What happens when a trigger fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TriggerResponse {
    /// Apply a mask to the state.
    Mask(Mask),
    /// Apply direct emotional deltas to the state.
    Deltas(BTreeMap<Emotion, f64>),
}

impl TriggerResponse {
    /// Apply this response to a state, returning a derived copy.
    #[must_use]
    pub fn apply(&self, state: &EmotionalState) -> EmotionalState {
        match self {
            Self::Mask(mask) => mask.apply(state),
            Self::Deltas(deltas) => {
                let pairs: Vec<(Emotion, f64)> =
                    deltas.iter().map(|(e, d)| (*e, *d)).collect();
                let mut next = state.clone();
                next.apply_delta(&pairs, 1.0);
                next
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Emotional trigger
// ---------------------------------------------------------------------------

/// A trigger that activates based on the current emotional state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalTrigger {
    /// Human-readable description of what triggers this.
    pub description: String,
    /// Rules that must be satisfied for the trigger to fire.
    pub rules: Vec<EmotionRule>,
    /// If true (default), all rules must pass; otherwise any one suffices.
    pub match_all: bool,
    /// What happens when the trigger fires.
    pub response: Option<TriggerResponse>,
    /// Whether this trigger is currently considered at all.
    pub active: bool,
    /// Ordering priority when several triggers fire (higher first).
    pub priority: i32,
}

impl EmotionalTrigger {
    /// Create an all-rules-must-match trigger.
    #[must_use]
    pub fn new(description: impl Into<String>, rules: Vec<EmotionRule>) -> Self {
        Self {
            description: description.into(),
            rules,
            match_all: true,
            response: None,
            active: true,
            priority: 0,
        }
    }

    /// Builder-style response.
    #[must_use]
    pub fn with_response(mut self, response: TriggerResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// Builder-style any-match behavior.
    #[must_use]
    pub fn with_match_any(mut self) -> Self {
        self.match_all = false;
        self
    }

    /// Builder-style priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether this trigger should fire for the given state.
    ///
    /// A pure predicate: the state is never mutated. Inactive and
    /// rule-less triggers never fire. Rules over untracked emotions
    /// evaluate to false.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::EmotionNotFound`](crate::PersonaError::EmotionNotFound)
    /// if a rule references an emotion the state does not track under
    /// `match_all` — a misconfigured rule set should surface, not silently
    /// pass.
    pub fn check(&self, state: &EmotionalState) -> Result<bool> {
        if !self.active || self.rules.is_empty() {
            return Ok(false);
        }
        let mut any = false;
        let mut all = true;
        for rule in &self.rules {
            let passed = match state.get(rule.emotion) {
                Ok(value) => rule.op.evaluate(value, rule.threshold),
                Err(err) if self.match_all => return Err(err),
                Err(_) => false,
            };
            any |= passed;
            all &= passed;
        }
        Ok(if self.match_all { all } else { any })
    }

    /// Apply the trigger's response, returning a derived state. With no
    /// response configured, the state passes through unchanged.
    #[must_use]
    pub fn fire(&self, state: &EmotionalState) -> EmotionalState {
        match &self.response {
            Some(response) => response.apply(state),
            None => state.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Situational trigger
// ---------------------------------------------------------------------------

/// A trigger that activates based on situational context.
///
/// Field rules compare against numeric fact values; keyword rules match
/// case-insensitive substrings of the situation description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SituationalTrigger {
    /// Human-readable description of what triggers this.
    pub description: String,
    /// Rules over numeric situational fields.
    pub rules: Vec<FieldRule>,
    /// Keywords to match in situation text.
    pub keywords: Vec<String>,
    /// If true (default), all field rules must pass; otherwise any one
    /// suffices.
    pub match_all: bool,
    /// What happens when the trigger fires.
    pub response: Option<TriggerResponse>,
    /// Whether this trigger is currently considered at all.
    pub active: bool,
    /// Ordering priority when several triggers fire (higher first).
    pub priority: i32,
}

impl SituationalTrigger {
    /// Create an all-rules-must-match trigger.
    #[must_use]
    pub fn new(description: impl Into<String>, rules: Vec<FieldRule>) -> Self {
        Self {
            description: description.into(),
            rules,
            keywords: Vec::new(),
            match_all: true,
            response: None,
            active: true,
            priority: 0,
        }
    }

    /// Builder-style keywords.
    #[must_use]
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Builder-style response.
    #[must_use]
    pub fn with_response(mut self, response: TriggerResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// Builder-style any-match behavior.
    #[must_use]
    pub fn with_match_any(mut self) -> Self {
        self.match_all = false;
        self
    }

    /// Whether any keyword matches the text (case-insensitive substring).
    #[must_use]
    pub fn check_text(&self, situation_text: &str) -> bool {
        if !self.active || self.keywords.is_empty() {
            return false;
        }
        let lowered = situation_text.to_lowercase();
        self.keywords
            .iter()
            .any(|kw| lowered.contains(&kw.to_lowercase()))
    }

    /// Whether this trigger should fire for the given context.
    ///
    /// Keyword matches against the context description short-circuit to
    /// true; otherwise the field rules are evaluated against the context's
    /// numeric facts (missing or non-numeric fields fail their rule).
    #[must_use]
    pub fn check(&self, context: &SituationalContext) -> bool {
        if !self.active {
            return false;
        }
        if let Some(description) = &context.description {
            if self.check_text(description) {
                return true;
            }
        }
        if self.rules.is_empty() {
            return false;
        }
        let results = self.rules.iter().map(|rule| {
            context
                .numeric_value(&rule.field)
                .is_some_and(|v| rule.op.evaluate(v, rule.threshold))
        });
        if self.match_all {
            results.fold(true, |acc, r| acc && r)
        } else {
            results.fold(false, |acc, r| acc || r)
        }
    }

    /// Apply the trigger's response, returning a derived state.
    #[must_use]
    pub fn fire(&self, state: &EmotionalState) -> EmotionalState {
        match &self.response {
            Some(response) => response.apply(state),
            None => state.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
