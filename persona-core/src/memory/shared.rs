//! Memories shared between multiple individuals, each with their own
//! perspective.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::SituationalContext;
use crate::embedding::Embedding;
use crate::memory::MemoryId;
use crate::state::EmotionalState;

/// An experience involving multiple participants.
///
/// Each participant may carry their own interpretation of what happened
/// and their own emotional snapshot of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedMemory {
    /// Unique identifier.
    pub id: MemoryId,
    /// Human-readable description of the shared experience.
    pub description: String,
    /// When the memory was created.
    pub created_at: DateTime<Utc>,
    /// Individuals who share this memory.
    pub participant_ids: Vec<String>,
    /// Per-participant interpretations of the memory.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub perspectives: BTreeMap<String, String>,
    /// Per-participant emotional snapshots.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub emotional_states: BTreeMap<String, EmotionalState>,
    /// Consensus emotional snapshot, if one applies to the whole group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_state: Option<EmotionalState>,
    /// Structured situational context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<SituationalContext>,
    /// Embedding, attached at store time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Embedding>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl SharedMemory {
    /// Create a shared memory stamped now.
    #[must_use]
    pub fn new(description: impl Into<String>, participant_ids: Vec<String>) -> Self {
        Self {
            id: MemoryId::new(),
            description: description.into(),
            created_at: Utc::now(),
            participant_ids,
            perspectives: BTreeMap::new(),
            emotional_states: BTreeMap::new(),
            emotional_state: None,
            context: None,
            embedding: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style situational context.
    #[must_use]
    pub fn with_context(mut self, context: SituationalContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Add a participant if not already present.
    pub fn add_participant(&mut self, individual_id: impl Into<String>) {
        let id = individual_id.into();
        if !self.participant_ids.contains(&id) {
            self.participant_ids.push(id);
        }
    }

    /// Whether the given individual shares this memory.
    #[must_use]
    pub fn is_participant(&self, individual_id: &str) -> bool {
        self.participant_ids.iter().any(|p| p == individual_id)
    }

    /// Set an individual's perspective; adds them as a participant if
    /// needed.
    pub fn set_perspective(&mut self, individual_id: impl Into<String>, perspective: impl Into<String>) {
        let id = individual_id.into();
        self.perspectives.insert(id.clone(), perspective.into());
        self.add_participant(id);
    }

    /// An individual's perspective, if recorded.
    #[must_use]
    pub fn perspective(&self, individual_id: &str) -> Option<&str> {
        self.perspectives.get(individual_id).map(String::as_str)
    }

    /// Record an individual's emotional snapshot of this memory.
    pub fn set_emotional_state(&mut self, individual_id: impl Into<String>, state: EmotionalState) {
        self.emotional_states.insert(individual_id.into(), state);
    }

    /// An individual's emotional snapshot, if recorded.
    #[must_use]
    pub fn emotional_state_of(&self, individual_id: &str) -> Option<&EmotionalState> {
        self.emotional_states.get(individual_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::Emotion;

    #[test]
    fn perspectives_track_participants() {
        let mut memory = SharedMemory::new(
            "Group dinner at the Italian restaurant",
            vec!["sarah".to_string(), "mike".to_string()],
        );
        memory.set_perspective("sarah", "Great food, but Mike was being annoying");
        memory.set_perspective("alex", "Glad I was invited");

        assert!(memory.is_participant("alex"));
        assert_eq!(
            memory.perspective("sarah"),
            Some("Great food, but Mike was being annoying")
        );
        assert_eq!(memory.perspective("mike"), None);
    }

    #[test]
    fn per_participant_emotional_states() {
        let mut memory = SharedMemory::new("launch party", vec!["a".to_string(), "b".to_string()]);
        let mut state = EmotionalState::new();
        state.set(Emotion::Proud, 0.9).unwrap();
        memory.set_emotional_state("a", state);

        assert!(memory.emotional_state_of("a").is_some());
        assert!(memory.emotional_state_of("b").is_none());
    }

    #[test]
    fn add_participant_deduplicates() {
        let mut memory = SharedMemory::new("x", vec!["a".to_string()]);
        memory.add_participant("a");
        assert_eq!(memory.participant_ids.len(), 1);
    }
}
