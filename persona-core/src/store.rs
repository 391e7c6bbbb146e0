//! Vector store contract and the in-memory implementation.
//!
//! Stores persist `(memory, embedding)` pairs and rank memories by cosine
//! similarity. Trust gating is a post-filter over results, never the
//! store's concern.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::embedding::{cosine_similarity, Embedding};
use crate::error::{PersonaError, Result};
use crate::hnsw::MemoryIndex;
use crate::memory::{MemoryEntry, MemoryId};

/// A ranked search hit: the memory and its cosine similarity to the query.
pub type ScoredMemory = (MemoryEntry, f32);

/// Storage contract for memory + embedding pairs.
///
/// Implementations must rank [`search`](Self::search) results by
/// descending similarity, break ties by most-recent creation timestamp,
/// and truncate (never pad) to `limit`.
pub trait VectorStore {
    /// Store a memory with its embedding. The embedding is attached to
    /// the stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::DimensionMismatch`] if the embedding's
    /// dimensionality differs from the store's configured dimension.
    fn store(&mut self, entry: MemoryEntry, embedding: Embedding) -> Result<()>;

    /// The most similar memories to `query_embedding`, optionally scoped
    /// to memories involving `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::DimensionMismatch`] for a query of the
    /// wrong dimensionality.
    fn search(
        &self,
        query_embedding: &Embedding,
        limit: usize,
        owner_id: Option<&str>,
    ) -> Result<Vec<ScoredMemory>>;

    /// Retrieve a memory by ID.
    fn get(&self, memory_id: MemoryId) -> Option<MemoryEntry>;

    /// Delete a memory by ID. Returns whether anything was deleted.
    fn delete(&mut self, memory_id: MemoryId) -> bool;

    /// Replace a stored memory's embedding. Returns whether the memory
    /// was found.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::DimensionMismatch`] for an embedding of
    /// the wrong dimensionality.
    fn update_embedding(&mut self, memory_id: MemoryId, embedding: Embedding) -> Result<bool>;

    /// Number of stored memories, optionally scoped to an owner.
    fn count(&self, owner_id: Option<&str>) -> usize;

    /// The store's embedding dimensionality.
    fn dimensions(&self) -> usize;
}

/// Drop every private memory whose threshold exceeds the requester's
/// trust level. Non-private memories always pass. Silently returning a
/// smaller list is intentional — use
/// [`PrivateMemory::require_access`](crate::memory::PrivateMemory::require_access)
/// to get an error instead.
#[must_use]
pub fn filter_accessible(entries: Vec<MemoryEntry>, trust_level: f64) -> Vec<MemoryEntry> {
    entries
        .into_iter()
        .filter(|e| e.is_accessible(trust_level))
        .collect()
}

/// Sort hits by descending similarity; equal similarities rank the
/// most-recently created memory first.
pub(crate) fn rank_hits(hits: &mut [ScoredMemory]) {
    hits.sort_by(|a, b| {
        OrderedFloat(b.1)
            .cmp(&OrderedFloat(a.1))
            .then_with(|| b.0.created_at().cmp(&a.0.created_at()))
    });
}

// ---------------------------------------------------------------------------
// InMemoryVectorStore
// ---------------------------------------------------------------------------

/// In-memory vector store.
///
/// Uses an exact scan while small; past `brute_force_threshold` entries
/// it generates candidates from an HNSW index and exact-rescores them
/// (results are then approximate in recall, still exactly ranked).
pub struct InMemoryVectorStore {
    dimensions: usize,
    brute_force_threshold: usize,
    entries: HashMap<MemoryId, (MemoryEntry, Embedding)>,
    index: MemoryIndex,
}

impl InMemoryVectorStore {
    /// Default entry count above which search switches to the ANN index.
    pub const DEFAULT_BRUTE_FORCE_THRESHOLD: usize = 256;

    /// Create a store for embeddings of the given dimensionality.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            brute_force_threshold: Self::DEFAULT_BRUTE_FORCE_THRESHOLD,
            entries: HashMap::new(),
            index: MemoryIndex::new(),
        }
    }

    /// Override the brute-force threshold.
    #[must_use]
    pub fn with_brute_force_threshold(mut self, threshold: usize) -> Self {
        self.brute_force_threshold = threshold;
        self
    }

    /// All stored memories, in arbitrary order.
    #[must_use]
    pub fn all(&self) -> Vec<MemoryEntry> {
        self.entries.values().map(|(m, _)| m.clone()).collect()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn check_dimensions(&self, embedding: &Embedding) -> Result<()> {
        if embedding.dimensions() == self.dimensions {
            Ok(())
        } else {
            Err(PersonaError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.dimensions(),
            })
        }
    }

    fn exact_search(
        &self,
        query: &Embedding,
        limit: usize,
        owner_id: Option<&str>,
    ) -> Vec<ScoredMemory> {
        let mut hits: Vec<ScoredMemory> = self
            .entries
            .values()
            .filter(|(entry, _)| owner_id.is_none_or(|o| entry.involves(o)))
            .map(|(entry, embedding)| (entry.clone(), cosine_similarity(query, embedding)))
            .collect();
        rank_hits(&mut hits);
        hits.truncate(limit);
        hits
    }

    fn indexed_search(
        &self,
        query: &Embedding,
        limit: usize,
        owner_id: Option<&str>,
    ) -> Vec<ScoredMemory> {
        // Over-fetch so owner filtering still fills the limit.
        let candidates = self.index.search(query, limit.saturating_mul(4).max(limit));
        let mut hits: Vec<ScoredMemory> = candidates
            .into_iter()
            .filter_map(|hit| self.entries.get(&hit.memory_id))
            .filter(|(entry, _)| owner_id.is_none_or(|o| entry.involves(o)))
            .map(|(entry, embedding)| (entry.clone(), cosine_similarity(query, embedding)))
            .collect();
        rank_hits(&mut hits);
        hits.truncate(limit);
        hits
    }
}

impl VectorStore for InMemoryVectorStore {
    fn store(&mut self, mut entry: MemoryEntry, embedding: Embedding) -> Result<()> {
        self.check_dimensions(&embedding)?;
        entry.set_embedding(embedding.clone());
        let id = entry.id();
        self.index.insert(id, &embedding);
        self.entries.insert(id, (entry, embedding));

        // Keep the ANN graph warm once the store is big enough to use it.
        if self.entries.len() > self.brute_force_threshold && self.index.needs_rebuild() {
            self.index.build();
        }
        Ok(())
    }

    fn search(
        &self,
        query_embedding: &Embedding,
        limit: usize,
        owner_id: Option<&str>,
    ) -> Result<Vec<ScoredMemory>> {
        self.check_dimensions(query_embedding)?;
        if self.entries.len() <= self.brute_force_threshold {
            Ok(self.exact_search(query_embedding, limit, owner_id))
        } else {
            Ok(self.indexed_search(query_embedding, limit, owner_id))
        }
    }

    fn get(&self, memory_id: MemoryId) -> Option<MemoryEntry> {
        self.entries.get(&memory_id).map(|(m, _)| m.clone())
    }

    fn delete(&mut self, memory_id: MemoryId) -> bool {
        if self.entries.remove(&memory_id).is_some() {
            self.index.remove(memory_id);
            true
        } else {
            false
        }
    }

    fn update_embedding(&mut self, memory_id: MemoryId, embedding: Embedding) -> Result<bool> {
        self.check_dimensions(&embedding)?;
        let Some((entry, stored)) = self.entries.get_mut(&memory_id) else {
            return Ok(false);
        };
        entry.set_embedding(embedding.clone());
        *stored = embedding.clone();
        self.index.remove(memory_id);
        self.index.insert(memory_id, &embedding);
        Ok(true)
    }

    fn count(&self, owner_id: Option<&str>) -> usize {
        match owner_id {
            None => self.entries.len(),
            Some(owner) => self
                .entries
                .values()
                .filter(|(entry, _)| entry.involves(owner))
                .count(),
        }
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
