//! Memory types: individual, shared, and trust-gated private memories.
//!
//! A memory is created once, gets its embedding attached at store time,
//! and is never structurally mutated afterwards except for the private
//! disclosure counter and deletion by its owning store.

pub mod individual;
pub mod private;
pub mod shared;

pub use individual::IndividualMemory;
pub use private::PrivateMemory;
pub use shared::SharedMemory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::context::SituationalContext;
use crate::embedding::Embedding;
use crate::state::EmotionalState;

/// Unique identifier for a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryId(pub Uuid);

impl MemoryId {
    /// Create a new random memory ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MemoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verbal intensity bucket for an emotion value, used in embedding text.
#[must_use]
pub fn intensity_label(value: f64) -> &'static str {
    if value >= 0.8 {
        "very high"
    } else if value >= 0.6 {
        "high"
    } else if value >= 0.4 {
        "moderate"
    } else if value >= 0.2 {
        "mild"
    } else {
        "minimal"
    }
}

/// Compose embedding text from a memory's description, emotional snapshot,
/// and situational context.
#[must_use]
pub(crate) fn compose_embedding_text(
    description: &str,
    emotional_state: Option<&EmotionalState>,
    context: Option<&SituationalContext>,
) -> String {
    let mut parts = vec![description.to_string()];

    if let Some(state) = emotional_state {
        if let Some((emotion, value)) = state.dominant() {
            parts.push(format!(
                "Emotional state: {emotion} ({})",
                intensity_label(value)
            ));
        }
    }

    if let Some(context) = context {
        let text = context.to_embedding_text();
        if !text.is_empty() {
            parts.push(text);
        }
    }

    parts.join("\n")
}

/// A unified memory entry holding any of the three memory variants.
///
/// The vector store and retrieval functions rank memories of different
/// variants through this single interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemoryEntry {
    /// A personal memory belonging to a single individual.
    Individual(IndividualMemory),
    /// A memory shared between multiple individuals.
    Shared(SharedMemory),
    /// A sensitive memory with trust-gated access.
    Private(PrivateMemory),
}

impl MemoryEntry {
    /// The memory's unique identifier.
    #[must_use]
    pub fn id(&self) -> MemoryId {
        match self {
            Self::Individual(m) => m.id,
            Self::Shared(m) => m.id,
            Self::Private(m) => m.id,
        }
    }

    /// The memory's description text.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Individual(m) => &m.description,
            Self::Shared(m) => &m.description,
            Self::Private(m) => &m.description,
        }
    }

    /// When the memory was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Individual(m) => m.created_at,
            Self::Shared(m) => m.created_at,
            Self::Private(m) => m.created_at,
        }
    }

    /// The emotional snapshot taken when the memory formed, if any.
    #[must_use]
    pub fn emotional_state(&self) -> Option<&EmotionalState> {
        match self {
            Self::Individual(m) => m.emotional_state.as_ref(),
            Self::Shared(m) => m.emotional_state.as_ref(),
            Self::Private(m) => m.emotional_state.as_ref(),
        }
    }

    /// The structured situational context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&SituationalContext> {
        match self {
            Self::Individual(m) => m.context.as_ref(),
            Self::Shared(m) => m.context.as_ref(),
            Self::Private(m) => m.context.as_ref(),
        }
    }

    /// The attached embedding, if any.
    #[must_use]
    pub fn embedding(&self) -> Option<&Embedding> {
        match self {
            Self::Individual(m) => m.embedding.as_ref(),
            Self::Shared(m) => m.embedding.as_ref(),
            Self::Private(m) => m.embedding.as_ref(),
        }
    }

    /// Attach or replace the embedding (done by the store at store time).
    pub fn set_embedding(&mut self, embedding: Embedding) {
        match self {
            Self::Individual(m) => m.embedding = Some(embedding),
            Self::Shared(m) => m.embedding = Some(embedding),
            Self::Private(m) => m.embedding = Some(embedding),
        }
    }

    /// The owning individual for owned variants; shared memories have no
    /// single owner.
    #[must_use]
    pub fn owner_id(&self) -> Option<&str> {
        match self {
            Self::Individual(m) => Some(&m.owner_id),
            Self::Private(m) => Some(&m.owner_id),
            Self::Shared(_) => None,
        }
    }

    /// Whether the entry involves the given individual, as owner or
    /// participant. This is what owner-scoped store queries filter on.
    #[must_use]
    pub fn involves(&self, individual_id: &str) -> bool {
        match self {
            Self::Individual(m) => m.owner_id == individual_id,
            Self::Private(m) => m.owner_id == individual_id,
            Self::Shared(m) => m.is_participant(individual_id),
        }
    }

    /// Whether a requester with the given trust level may read this entry.
    /// Non-private memories are always accessible.
    #[must_use]
    pub fn is_accessible(&self, trust_level: f64) -> bool {
        match self {
            Self::Private(m) => m.can_access(trust_level),
            _ => true,
        }
    }

    /// Text representation used for embedding generation.
    #[must_use]
    pub fn to_embedding_text(&self) -> String {
        compose_embedding_text(
            self.description(),
            self.emotional_state(),
            self.context(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
