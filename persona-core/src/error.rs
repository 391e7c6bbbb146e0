//! Error types for the persona state engine.

use thiserror::Error;

/// Top-level error type for all engine operations.
///
/// Every failure is raised synchronously at the call that violates the
/// invariant; the engine never retries internally and never swallows a
/// raised violation. Filtering operations (trust gating, category queries)
/// return empty results instead of erroring — "nothing qualifies" is a
/// valid outcome, not a failure.
#[derive(Error, Debug)]
pub enum PersonaError {
    /// A value fell outside its valid `[0.0, 1.0]` range.
    #[error("Value {value} for '{field}' is outside valid range [0.0, 1.0]")]
    OutOfRange {
        /// Which field or emotion/trait carried the bad value.
        field: String,
        /// The offending value.
        value: f64,
    },

    /// An embedding's dimensionality does not match the store's configured
    /// dimension.
    #[error("Embedding has {actual} dimensions, store expects {expected}")]
    DimensionMismatch {
        /// Dimensions the store was configured with.
        expected: usize,
        /// Dimensions of the rejected embedding.
        actual: usize,
    },

    /// Generic input validation failure (malformed rule, bad participant
    /// set, invalid closure result).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An emotion name is not part of the 36-name universe (or not tracked
    /// by the state it was used against).
    #[error("Unknown emotion '{name}'. Valid emotions: {universe}")]
    EmotionNotFound {
        /// The unrecognized name.
        name: String,
        /// Comma-separated valid universe, for the error message.
        universe: String,
    },

    /// A trait name is not part of the 17-name universe.
    #[error("Unknown trait '{name}'. Valid traits: {universe}")]
    TraitNotFound {
        /// The unrecognized name.
        name: String,
        /// Comma-separated valid universe, for the error message.
        universe: String,
    },

    /// A memory with the given ID was not found in the store.
    #[error("Memory not found: {0}")]
    MemoryNotFound(crate::memory::MemoryId),

    /// A relationship lookup referenced an individual that is not a
    /// participant of the relationship.
    #[error("Individual '{id}' is not a participant of relationship {relationship} (participants: {participants})")]
    ParticipantNotFound {
        /// The unknown individual id.
        id: String,
        /// The relationship that was queried.
        relationship: String,
        /// Comma-separated participant ids, for the error message.
        participants: String,
    },

    /// An explicit require-access operation was denied by a trust gate.
    ///
    /// Raised only when access is *demanded*; list filtering silently
    /// omits inaccessible items instead.
    #[error("Insufficient trust level {actual:.2} (requires {required:.2})")]
    TrustThreshold {
        /// Trust level required by the gated resource.
        required: f64,
        /// Trust level the requester actually holds.
        actual: f64,
    },

    /// Engine or file configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No relationship path exists within the allowed depth.
    #[error("No relationship path from '{from}' to '{to}' within depth {max_depth}")]
    NoPath {
        /// Path start.
        from: String,
        /// Path target.
        to: String,
        /// Depth limit the search was bounded by.
        max_depth: usize,
    },

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, PersonaError>;
