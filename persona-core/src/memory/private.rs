//! Trust-gated private memories.
//!
//! A private memory is readable by a requester only if the requester's
//! trust level meets the memory's threshold. List filtering silently
//! omits inaccessible memories; the explicit
//! [`require_access`](PrivateMemory::require_access) operation raises.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::SituationalContext;
use crate::embedding::Embedding;
use crate::error::{PersonaError, Result};
use crate::memory::MemoryId;
use crate::state::EmotionalState;

/// A sensitive memory requiring a minimum trust level for access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateMemory {
    /// Unique identifier.
    pub id: MemoryId,
    /// The individual who owns this memory.
    pub owner_id: String,
    /// Human-readable description of the experience.
    pub description: String,
    /// When the memory was created.
    pub created_at: DateTime<Utc>,
    /// Minimum trust level required to access, `[0.0, 1.0]`.
    pub trust_threshold: f64,
    /// How many times this memory has been disclosed. Monotonically
    /// incrementing; the only mutable field after creation.
    #[serde(default)]
    pub disclosure_count: u64,
    /// Tags for categorizing private memories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
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

impl PrivateMemory {
    /// Create a private memory stamped now.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `trust_threshold` is
    /// outside `[0.0, 1.0]`.
    pub fn new(
        owner_id: impl Into<String>,
        description: impl Into<String>,
        trust_threshold: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&trust_threshold) {
            return Err(PersonaError::OutOfRange {
                field: "trust_threshold".to_string(),
                value: trust_threshold,
            });
        }
        Ok(Self {
            id: MemoryId::new(),
            owner_id: owner_id.into(),
            description: description.into(),
            created_at: Utc::now(),
            trust_threshold,
            disclosure_count: 0,
            tags: Vec::new(),
            emotional_state: None,
            context: None,
            embedding: None,
            metadata: BTreeMap::new(),
        })
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

    /// Builder-style tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Whether the given trust level allows access: `trust_level >=
    /// trust_threshold`.
    #[must_use]
    pub fn can_access(&self, trust_level: f64) -> bool {
        trust_level >= self.trust_threshold
    }

    /// Demand access at the given trust level.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::TrustThreshold`] when the trust level is
    /// below the threshold.
    pub fn require_access(&self, trust_level: f64) -> Result<()> {
        if self.can_access(trust_level) {
            Ok(())
        } else {
            Err(PersonaError::TrustThreshold {
                required: self.trust_threshold,
                actual: trust_level,
            })
        }
    }

    /// Record that this memory has been disclosed.
    pub fn record_disclosure(&mut self) {
        self.disclosure_count += 1;
    }

    /// Human-readable sensitivity level derived from the threshold.
    #[must_use]
    pub fn sensitivity_level(&self) -> &'static str {
        if self.trust_threshold >= 0.9 {
            "extremely sensitive"
        } else if self.trust_threshold >= 0.7 {
            "highly sensitive"
        } else if self.trust_threshold >= 0.5 {
            "moderately sensitive"
        } else if self.trust_threshold >= 0.3 {
            "mildly sensitive"
        } else {
            "minimally sensitive"
        }
    }

    /// Whether this memory belongs to the given individual.
    #[must_use]
    pub fn belongs_to(&self, individual_id: &str) -> bool {
        self.owner_id == individual_id
    }

    /// Add a tag if not already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Whether this memory has a specific tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
