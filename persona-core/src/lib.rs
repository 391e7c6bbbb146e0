//! # Persona Core
//!
//! Psychological state engine for simulated individuals.
//!
//! The engine models the inner state that drives persona-based text
//! generation:
//!
//! - **Emotions** — a fixed universe of 36 named intensities in 6
//!   categories ([`EmotionalState`])
//! - **Traits** — 17 stable personality dimensions ([`TraitProfile`])
//!   with a static trait→emotion coefficient table
//! - **Dynamics** — trait-modulated deltas, antagonistic-pair
//!   suppression, explicit decay, and Markov-style category transitions
//!   ([`TransitionMatrix`])
//! - **Aggregation** — rolling-history state calculation
//!   ([`StateCalculator`])
//! - **Masks & triggers** — situational overlays applied at read time
//!   ([`Mask`], [`EmotionalTrigger`], [`SituationalTrigger`])
//! - **Memory** — individual/shared/private memories with trust-gated
//!   access, embedding similarity retrieval, and in-memory or SQLite
//!   vector stores
//! - **Relationships** — asymmetric trust networks with path queries and
//!   multiplicative path trust ([`RelationshipNetwork`])
//!
//! All operations are synchronous, pure computations over in-memory
//! value objects. Callers own the serialization of concurrent writes to
//! one individual's state; runs over different individuals are
//! independent.
//!
//! ## A simulation turn
//!
//! ```
//! use persona_core::{
//!     Emotion, EmotionalState, EmotionRule, EmotionalTrigger, TriggerOp,
//!     TriggerResponse, stoic_mask,
//! };
//!
//! # fn main() -> persona_core::Result<()> {
//! let mut state = EmotionalState::new();
//! state.set(Emotion::Anxious, 0.9)?;
//!
//! // Triggers react to the current state...
//! let trigger = EmotionalTrigger::new(
//!     "compose under pressure",
//!     vec![EmotionRule::new(Emotion::Anxious, TriggerOp::Gt, 0.8)],
//! )
//! .with_response(TriggerResponse::Mask(stoic_mask()));
//!
//! // ...and masks shape what gets expressed, not what is felt.
//! let expressed = if trigger.check(&state)? {
//!     trigger.fire(&state)
//! } else {
//!     state.clone()
//! };
//! assert!(expressed.get(Emotion::Anxious)? < state.get(Emotion::Anxious)?);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod calculator;
pub mod coefficients;
pub mod config;
pub mod context;
pub mod embedding;
pub mod emotion;
pub mod error;
pub mod hnsw;
pub mod mask;
pub mod memory;
pub mod network;
pub mod relationship;
pub mod retrieval;
pub mod sqlite_store;
pub mod state;
pub mod store;
pub mod traits;
pub mod transition;
pub mod trigger;

pub use calculator::{StateCalculator, StateMode};
pub use coefficients::{affected_emotions, coefficient, emotion_modifier, traits_affecting};
pub use config::PersonaConfig;
pub use context::{Fact, FactCategory, SituationalContext};
pub use embedding::{
    cosine_similarity, CachingEmbeddingProvider, Embedding, EmbeddingProvider,
    HashEmbeddingProvider,
};
pub use emotion::{Emotion, EmotionCategory};
pub use error::{PersonaError, Result};
pub use mask::{
    casual_mask, default_masks, enthusiastic_mask, guarded_mask, mask_by_name, nurturing_mask,
    professional_mask, stoic_mask, Mask,
};
pub use memory::{IndividualMemory, MemoryEntry, MemoryId, PrivateMemory, SharedMemory};
pub use network::RelationshipNetwork;
pub use relationship::{Relationship, TrustChange, TrustLevel};
pub use retrieval::{get_relevant_memories, search_memories, store_memory};
pub use sqlite_store::SqliteVectorStore;
pub use state::EmotionalState;
pub use store::{filter_accessible, InMemoryVectorStore, ScoredMemory, VectorStore};
pub use traits::{PersonalityTrait, TraitProfile};
pub use transition::TransitionMatrix;
pub use trigger::{
    EmotionRule, EmotionalTrigger, FieldRule, SituationalTrigger, TriggerOp, TriggerResponse,
};
