//! Personal memories belonging to a single individual.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::SituationalContext;
use crate::embedding::Embedding;
use crate::error::{PersonaError, Result};
use crate::memory::MemoryId;
use crate::state::EmotionalState;

/// A memory belonging to one individual, not shared by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualMemory {
    /// Unique identifier.
    pub id: MemoryId,
    /// The individual who owns this memory.
    pub owner_id: String,
    /// Human-readable description of the experience.
    pub description: String,
    /// When the memory was created.
    pub created_at: DateTime<Utc>,
    /// How memorable this is, `[0.0, 1.0]`.
    pub salience: f64,
    /// Emotional snapshot at the time of the memory.
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

impl IndividualMemory {
    /// Create a memory with default 0.5 salience, stamped now.
    #[must_use]
    pub fn new(owner_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: MemoryId::new(),
            owner_id: owner_id.into(),
            description: description.into(),
            created_at: Utc::now(),
            salience: 0.5,
            emotional_state: None,
            context: None,
            embedding: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style salience.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `salience` is outside
    /// `[0.0, 1.0]`.
    pub fn with_salience(mut self, salience: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&salience) {
            return Err(PersonaError::OutOfRange {
                field: "salience".to_string(),
                value: salience,
            });
        }
        self.salience = salience;
        Ok(self)
    }

    /// Builder-style emotional snapshot.
    #[must_use]
    pub fn with_emotional_state(mut self, state: EmotionalState) -> Self {
        self.emotional_state = Some(state);
        self
    }

    /// Builder-style situational context.
    #[must_use]
    pub fn with_context(mut self, context: SituationalContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Whether this memory belongs to the given individual.
    #[must_use]
    pub fn belongs_to(&self, individual_id: &str) -> bool {
        self.owner_id == individual_id
    }
}
