//! HNSW approximate nearest-neighbor index over memory embeddings.
//!
//! Wraps `instant-distance` for cosine-similarity candidate generation
//! when a store grows past its brute-force threshold. The graph is
//! immutable once built; inserts and removals queue up until the next
//! [`build`](MemoryIndex::build).

use instant_distance::{Builder, HnswMap, Point, Search};

use crate::embedding::Embedding;
use crate::memory::MemoryId;

/// A point in the index: an embedding normalized to unit length so cosine
/// similarity reduces to a dot product.
#[derive(Clone, Debug)]
struct IndexPoint {
    normalized: Vec<f32>,
}

impl IndexPoint {
    fn from_embedding(embedding: &Embedding) -> Self {
        let norm = embedding
            .0
            .iter()
            .map(|x| x * x)
            .sum::<f32>()
            .sqrt()
            .max(f32::EPSILON);
        Self {
            normalized: embedding.0.iter().map(|x| x / norm).collect(),
        }
    }
}

impl Point for IndexPoint {
    /// Cosine distance `1 - similarity`; mismatched dimensions are
    /// maximally distant.
    fn distance(&self, other: &Self) -> f32 {
        if self.normalized.len() != other.normalized.len() {
            return 1.0;
        }
        let dot: f32 = self
            .normalized
            .iter()
            .zip(other.normalized.iter())
            .map(|(a, b)| a * b)
            .sum();
        (1.0 - dot).max(0.0)
    }
}

/// A nearest-neighbor hit.
#[derive(Debug, Clone)]
pub struct IndexHit {
    /// The matching memory.
    pub memory_id: MemoryId,
    /// Cosine similarity to the query, `[-1.0, 1.0]`.
    pub similarity: f32,
}

/// Approximate nearest-neighbor index over memory embeddings.
///
/// Lifecycle: [`insert`](Self::insert) embeddings, [`build`](Self::build)
/// the graph, then [`search`](Self::search). Searching an unbuilt index
/// falls back to a linear scan, so the index is always usable.
pub struct MemoryIndex {
    points: Vec<IndexPoint>,
    ids: Vec<MemoryId>,
    map: Option<HnswMap<IndexPoint, MemoryId>>,
    dirty: usize,
    rebuild_fraction: f32,
}

impl MemoryIndex {
    /// Create an empty index. The graph auto-flags for rebuild once 20%
    /// of its points changed since the last build.
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            ids: Vec::new(),
            map: None,
            dirty: 0,
            rebuild_fraction: 0.2,
        }
    }

    /// Queue an embedding for indexing.
    pub fn insert(&mut self, memory_id: MemoryId, embedding: &Embedding) {
        self.points.push(IndexPoint::from_embedding(embedding));
        self.ids.push(memory_id);
        self.dirty += 1;
    }

    /// Remove a memory from the index. Takes effect immediately for the
    /// linear fallback; the HNSW graph drops it on the next rebuild.
    pub fn remove(&mut self, memory_id: MemoryId) {
        let mut i = 0;
        while i < self.ids.len() {
            if self.ids[i] == memory_id {
                self.ids.swap_remove(i);
                self.points.swap_remove(i);
                self.dirty += 1;
            } else {
                i += 1;
            }
        }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the index holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether enough points changed that the graph should be rebuilt.
    #[must_use]
    pub fn needs_rebuild(&self) -> bool {
        if self.points.is_empty() {
            return false;
        }
        if self.map.is_none() {
            return true;
        }
        (self.dirty as f32 / self.points.len() as f32) > self.rebuild_fraction
    }

    /// Build (or rebuild) the HNSW graph from all queued points.
    ///
    /// O(N log N); the build seed is fixed so graphs are reproducible.
    pub fn build(&mut self) {
        if self.points.is_empty() {
            self.map = None;
            self.dirty = 0;
            return;
        }
        let map = Builder::default()
            .seed(42)
            .build(self.points.clone(), self.ids.clone());
        self.map = Some(map);
        self.dirty = 0;
    }

    /// The `k` nearest neighbors to `query`, most similar first.
    ///
    /// Uses the HNSW graph when built, a linear scan otherwise. Removals
    /// since the last build are filtered out of graph results.
    #[must_use]
    pub fn search(&self, query: &Embedding, k: usize) -> Vec<IndexHit> {
        let query_point = IndexPoint::from_embedding(query);
        if let Some(map) = &self.map {
            let mut search = Search::default();
            map.search(&query_point, &mut search)
                .filter(|item| self.ids.contains(item.value))
                .take(k)
                .map(|item| IndexHit {
                    memory_id: *item.value,
                    similarity: 1.0 - item.distance,
                })
                .collect()
        } else {
            self.linear_scan(&query_point, k)
        }
    }

    fn linear_scan(&self, query: &IndexPoint, k: usize) -> Vec<IndexHit> {
        let mut scored: Vec<(f32, MemoryId)> = self
            .points
            .iter()
            .zip(self.ids.iter())
            .map(|(p, id)| (query.distance(p), *id))
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
            .into_iter()
            .map(|(distance, memory_id)| IndexHit {
                memory_id,
                similarity: 1.0 - distance,
            })
            .collect()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.points.clear();
        self.ids.clear();
        self.map = None;
        self.dirty = 0;
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
