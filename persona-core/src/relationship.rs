//! Relationships — directed trust between individuals, with a change log.
//!
//! Trust is asymmetric: `trust[from][to]` need not equal
//! `trust[to][from]`. Values are always clamped to `[0.0, 1.0]` and every
//! change is appended to an ordered log with its reason.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{PersonaError, Result};

/// Default trust for new acquaintances within a relationship.
pub const DEFAULT_TRUST: f64 = 0.3;

/// Trust toward individuals with no relationship at all.
pub const STRANGER_TRUST: f64 = 0.1;

/// Clamp a trust value into `[0.0, 1.0]`.
#[must_use]
pub fn clamp_trust(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Trust levels
// ---------------------------------------------------------------------------

/// Banded trust classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    /// No trust — actively suspicious or hostile.
    None,
    /// Minimal trust — cautious acquaintance.
    Minimal,
    /// Low trust — guarded interactions, withholds information.
    Low,
    /// Moderate trust — open communication, some reservations.
    Moderate,
    /// High trust — shares personal information, relies on the other.
    High,
    /// Complete trust — shares everything, deep bond.
    Complete,
}

impl TrustLevel {
    /// Classify a numeric trust value.
    #[must_use]
    pub fn from_value(trust: f64) -> Self {
        if trust >= 0.8 {
            Self::Complete
        } else if trust >= 0.6 {
            Self::High
        } else if trust >= 0.4 {
            Self::Moderate
        } else if trust >= 0.25 {
            Self::Low
        } else if trust >= 0.1 {
            Self::Minimal
        } else {
            Self::None
        }
    }

    /// Human-readable description of the band.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::None => "No trust - actively suspicious or hostile",
            Self::Minimal => "Minimal trust - cautious acquaintance",
            Self::Low => "Low trust - guarded interactions, withholds information",
            Self::Moderate => "Moderate trust - open communication, some reservations",
            Self::High => "High trust - shares personal information, relies on other",
            Self::Complete => "Complete trust - shares everything, deep bond",
        }
    }

    /// Whether individuals at this band disclose private memories.
    #[must_use]
    pub const fn shares_private_memories(self) -> bool {
        matches!(self, Self::High | Self::Complete)
    }

    /// How emotionally open interactions at this band are, `[0.0, 1.0]`.
    #[must_use]
    pub const fn emotional_openness(self) -> f64 {
        match self {
            Self::None => 0.1,
            Self::Minimal => 0.2,
            Self::Low => 0.4,
            Self::Moderate => 0.6,
            Self::High => 0.8,
            Self::Complete => 1.0,
        }
    }

    /// Modifier applied to disclosure tendencies at this band.
    #[must_use]
    pub const fn disclosure_modifier(self) -> f64 {
        match self {
            Self::None => -0.5,
            Self::Minimal => -0.3,
            Self::Low => -0.1,
            Self::Moderate => 0.0,
            Self::High => 0.2,
            Self::Complete => 0.4,
        }
    }
}

/// Apply a trust delta with resistance at the extremes: gains diminish
/// above 0.7 and losses soften below 0.3, then clamp.
#[must_use]
pub fn apply_trust_change(current: f64, change: f64) -> f64 {
    let effective = if change > 0.0 && current > 0.7 {
        change * (1.0 - (current - 0.7) / 0.3 * 0.5)
    } else if change < 0.0 && current < 0.3 {
        change * (current / 0.3 * 0.5 + 0.5)
    } else {
        change
    };
    clamp_trust(current + effective)
}

// ---------------------------------------------------------------------------
// Relationship
// ---------------------------------------------------------------------------

/// Record of one trust change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustChange {
    /// When the change occurred.
    pub timestamp: DateTime<Utc>,
    /// Who is trusting.
    pub from_individual: String,
    /// Who is being trusted.
    pub to_individual: String,
    /// Trust before the change.
    pub old_value: f64,
    /// Trust after the change.
    pub new_value: f64,
    /// Why the change happened.
    pub reason: String,
}

/// A relationship between two or more individuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier.
    pub id: Uuid,
    /// Participant ids, in insertion order. Always at least two distinct.
    pub individual_ids: Vec<String>,
    /// Directed trust: `trust[from][to]`.
    pub trust: BTreeMap<String, BTreeMap<String, f64>>,
    /// IDs of memories shared through this relationship.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_memory_ids: Vec<String>,
    /// Free-text relationship history.
    #[serde(default)]
    pub history: String,
    /// Kind of relationship ("friends", "coworkers", ...).
    #[serde(default)]
    pub relationship_type: String,
    /// When the relationship was created.
    pub created_at: DateTime<Utc>,
    /// Ordered log of trust changes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trust_history: Vec<TrustChange>,
}

impl Relationship {
    /// Create a relationship between the given individuals, every
    /// directed pair starting at [`DEFAULT_TRUST`]. Duplicate ids are
    /// collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Validation`] with fewer than two distinct
    /// participant ids — self-relationships are rejected.
    pub fn new(individual_ids: Vec<String>) -> Result<Self> {
        let mut unique: Vec<String> = Vec::with_capacity(individual_ids.len());
        for id in individual_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.len() < 2 {
            return Err(PersonaError::Validation(format!(
                "a relationship requires at least 2 distinct individual ids (got {unique:?})"
            )));
        }

        let mut trust = BTreeMap::new();
        for from in &unique {
            let row: BTreeMap<String, f64> = unique
                .iter()
                .filter(|to| *to != from)
                .map(|to| (to.clone(), DEFAULT_TRUST))
                .collect();
            trust.insert(from.clone(), row);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            individual_ids: unique,
            trust,
            shared_memory_ids: Vec::new(),
            history: String::new(),
            relationship_type: String::new(),
            created_at: Utc::now(),
            trust_history: Vec::new(),
        })
    }

    /// Create a two-plus-party relationship with symmetric starting
    /// trust: each id in `trust` extends that trust toward every other
    /// participant.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Validation`] for bad participants and
    /// [`PersonaError::OutOfRange`] for trust values outside `[0.0, 1.0]`.
    pub fn with_symmetric_trust(
        individual_ids: Vec<String>,
        trust: &BTreeMap<String, f64>,
    ) -> Result<Self> {
        for (id, value) in trust {
            if !(0.0..=1.0).contains(value) {
                return Err(PersonaError::OutOfRange {
                    field: format!("trust for '{id}'"),
                    value: *value,
                });
            }
        }
        let mut relationship = Self::new(individual_ids)?;
        for (from, value) in trust {
            if let Some(row) = relationship.trust.get_mut(from) {
                for slot in row.values_mut() {
                    *slot = *value;
                }
            }
        }
        Ok(relationship)
    }

    /// Builder-style history text.
    #[must_use]
    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = history.into();
        self
    }

    /// Builder-style relationship type.
    #[must_use]
    pub fn with_relationship_type(mut self, relationship_type: impl Into<String>) -> Self {
        self.relationship_type = relationship_type.into();
        self
    }

    fn require_participant(&self, id: &str) -> Result<()> {
        if self.has_individual(id) {
            Ok(())
        } else {
            Err(PersonaError::ParticipantNotFound {
                id: id.to_string(),
                relationship: self.id.to_string(),
                participants: self.individual_ids.join(", "),
            })
        }
    }

    /// Directed trust from one participant to another.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::ParticipantNotFound`] if either id is not
    /// a participant of this relationship.
    pub fn get_trust(&self, from: &str, to: &str) -> Result<f64> {
        self.require_participant(from)?;
        self.require_participant(to)?;
        Ok(self
            .trust
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(DEFAULT_TRUST))
    }

    /// Average of the two directed trust values.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::ParticipantNotFound`] for non-participants.
    pub fn mutual_trust(&self, a: &str, b: &str) -> Result<f64> {
        Ok((self.get_trust(a, b)? + self.get_trust(b, a)?) / 2.0)
    }

    /// Signed trust difference: positive when `a` trusts `b` more than
    /// `b` trusts `a`.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::ParticipantNotFound`] for non-participants.
    pub fn trust_asymmetry(&self, a: &str, b: &str) -> Result<f64> {
        Ok(self.get_trust(a, b)? - self.get_trust(b, a)?)
    }

    /// Banded classification of directed trust.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::ParticipantNotFound`] for non-participants.
    pub fn trust_level(&self, from: &str, to: &str) -> Result<TrustLevel> {
        Ok(TrustLevel::from_value(self.get_trust(from, to)?))
    }

    /// Change directed trust by a delta, append to the change log, and
    /// return the new value. Gains diminish near the top of the scale and
    /// losses soften near the bottom; the result is clamped to
    /// `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::ParticipantNotFound`] for non-participants.
    pub fn update_trust(
        &mut self,
        from: &str,
        to: &str,
        delta: f64,
        reason: impl Into<String>,
    ) -> Result<f64> {
        let current = self.get_trust(from, to)?;
        let new_value = apply_trust_change(current, delta);

        self.trust
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), new_value);
        self.trust_history.push(TrustChange {
            timestamp: Utc::now(),
            from_individual: from.to_string(),
            to_individual: to.to_string(),
            old_value: current,
            new_value,
            reason: reason.into(),
        });
        Ok(new_value)
    }

    /// Set directed trust to an absolute value (clamped), bypassing the
    /// resistance curve and the change log.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::ParticipantNotFound`] for non-participants.
    pub fn set_trust(&mut self, from: &str, to: &str, value: f64) -> Result<()> {
        self.require_participant(from)?;
        self.require_participant(to)?;
        self.trust
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), clamp_trust(value));
        Ok(())
    }

    /// Add a participant, extending `default_trust` (or
    /// [`DEFAULT_TRUST`]) in both directions with existing members.
    pub fn add_individual(&mut self, individual_id: impl Into<String>, default_trust: Option<f64>) {
        let id = individual_id.into();
        if self.has_individual(&id) {
            return;
        }
        let trust_value = clamp_trust(default_trust.unwrap_or(DEFAULT_TRUST));
        let existing: Vec<String> = self.individual_ids.clone();
        self.individual_ids.push(id.clone());

        let row: BTreeMap<String, f64> = existing
            .iter()
            .map(|other| (other.clone(), trust_value))
            .collect();
        self.trust.insert(id.clone(), row);
        for other in existing {
            self.trust
                .entry(other)
                .or_default()
                .insert(id.clone(), trust_value);
        }
    }

    /// Remove a participant and every trust edge touching them.
    pub fn remove_individual(&mut self, individual_id: &str) {
        self.individual_ids.retain(|i| i != individual_id);
        self.trust.remove(individual_id);
        for row in self.trust.values_mut() {
            row.remove(individual_id);
        }
    }

    /// Record a shared memory id (deduplicated).
    pub fn add_shared_memory(&mut self, memory_id: impl Into<String>) {
        let id = memory_id.into();
        if !self.shared_memory_ids.contains(&id) {
            self.shared_memory_ids.push(id);
        }
    }

    /// Whether an individual participates in this relationship.
    #[must_use]
    pub fn has_individual(&self, individual_id: &str) -> bool {
        self.individual_ids.iter().any(|i| i == individual_id)
    }

    /// Whether all the given individuals participate.
    #[must_use]
    pub fn involves(&self, individual_ids: &[&str]) -> bool {
        individual_ids.iter().all(|id| self.has_individual(id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn alice_bob() -> Relationship {
        let mut rel =
            Relationship::new(vec!["alice".to_string(), "bob".to_string()]).unwrap();
        rel.set_trust("alice", "bob", 0.8).unwrap();
        rel.set_trust("bob", "alice", 0.5).unwrap();
        rel
    }

    #[test]
    fn self_relationships_are_rejected() {
        assert!(Relationship::new(vec!["alice".to_string()]).is_err());
        assert!(
            Relationship::new(vec!["alice".to_string(), "alice".to_string()]).is_err()
        );
    }

    #[test]
    fn directed_trust_and_aggregates() {
        let rel = alice_bob();
        assert!((rel.get_trust("alice", "bob").unwrap() - 0.8).abs() < 1e-12);
        assert!((rel.get_trust("bob", "alice").unwrap() - 0.5).abs() < 1e-12);
        assert!((rel.mutual_trust("alice", "bob").unwrap() - 0.65).abs() < 1e-12);
        assert!((rel.trust_asymmetry("alice", "bob").unwrap() - 0.3).abs() < 1e-9);
        assert!((rel.trust_asymmetry("bob", "alice").unwrap() + 0.3).abs() < 1e-9);
    }

    #[test]
    fn unknown_participant_fails_lookup() {
        let rel = alice_bob();
        let err = rel.get_trust("alice", "carol").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("carol"));
        assert!(message.contains("alice, bob"));
    }

    #[test]
    fn symmetric_trust_constructor() {
        let trust: BTreeMap<String, f64> =
            [("alice".to_string(), 0.8), ("bob".to_string(), 0.5)]
                .into_iter()
                .collect();
        let rel = Relationship::with_symmetric_trust(
            vec!["alice".to_string(), "bob".to_string()],
            &trust,
        )
        .unwrap();
        assert!((rel.get_trust("alice", "bob").unwrap() - 0.8).abs() < 1e-12);
        assert!((rel.get_trust("bob", "alice").unwrap() - 0.5).abs() < 1e-12);

        let bad: BTreeMap<String, f64> = [("alice".to_string(), 1.4)].into_iter().collect();
        assert!(Relationship::with_symmetric_trust(
            vec!["alice".to_string(), "bob".to_string()],
            &bad
        )
        .is_err());
    }

    #[test]
    fn update_trust_logs_and_clamps() {
        let mut rel = alice_bob();
        let new_value = rel
            .update_trust("bob", "alice", 0.2, "helped move apartments")
            .unwrap();
        assert!((new_value - 0.7).abs() < 1e-12);
        assert_eq!(rel.trust_history.len(), 1);
        let change = &rel.trust_history[0];
        assert_eq!(change.reason, "helped move apartments");
        assert!((change.old_value - 0.5).abs() < 1e-12);

        // Repeated large negative changes floor at 0.
        for _ in 0..20 {
            rel.update_trust("bob", "alice", -0.4, "betrayal").unwrap();
        }
        assert!(rel.get_trust("bob", "alice").unwrap() >= 0.0);
    }

    #[test]
    fn trust_gains_diminish_near_the_top() {
        let plain = apply_trust_change(0.5, 0.2);
        assert!((plain - 0.7).abs() < 1e-12);
        // Already high: same delta yields less.
        let resisted = apply_trust_change(0.9, 0.2) - 0.9;
        assert!(resisted < 0.2);
        assert!(apply_trust_change(0.95, 0.5) <= 1.0);
    }

    #[test]
    fn trust_levels_band_correctly() {
        assert_eq!(TrustLevel::from_value(0.05), TrustLevel::None);
        assert_eq!(TrustLevel::from_value(0.3), TrustLevel::Low);
        assert_eq!(TrustLevel::from_value(0.5), TrustLevel::Moderate);
        assert_eq!(TrustLevel::from_value(0.7), TrustLevel::High);
        assert_eq!(TrustLevel::from_value(0.85), TrustLevel::Complete);
        assert_eq!(TrustLevel::from_value(1.0), TrustLevel::Complete);
        assert!(TrustLevel::High.shares_private_memories());
        assert!(!TrustLevel::Moderate.shares_private_memories());
    }

    #[test]
    fn membership_changes_update_trust_matrix() {
        let mut rel = alice_bob();
        rel.add_individual("carol", Some(0.4));
        assert!(rel.involves(&["alice", "bob", "carol"]));
        assert!((rel.get_trust("carol", "alice").unwrap() - 0.4).abs() < 1e-12);
        assert!((rel.get_trust("alice", "carol").unwrap() - 0.4).abs() < 1e-12);

        rel.remove_individual("carol");
        assert!(!rel.has_individual("carol"));
        assert!(rel.get_trust("alice", "carol").is_err());
    }

    #[test]
    fn serde_round_trip() {
        let rel = alice_bob();
        let json = serde_json::to_string(&rel).unwrap();
        let back: Relationship = serde_json::from_str(&json).unwrap();
        assert_eq!(rel, back);
    }
}
