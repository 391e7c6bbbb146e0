//! Vector embedding abstraction.
//!
//! The engine never depends on a concrete embedding model: providers are
//! injected through the [`EmbeddingProvider`] trait (the external LLM
//! layer supplies a real one). A deterministic hashing provider is
//! included for tests, development, and embedding-free deployments.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A dense embedding vector for semantic similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
    /// Dimensionality of the embedding.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// Cosine similarity to another embedding, in `[-1.0, 1.0]`.
    ///
    /// Returns 0.0 for mismatched dimensions or zero-magnitude vectors.
    #[must_use]
    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        cosine_similarity(self, other)
    }
}

/// Compute the cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`; 0.0 if the dimensions differ or
/// either vector has zero magnitude.
#[must_use]
pub fn cosine_similarity(a: &Embedding, b: &Embedding) -> f32 {
    if a.0.len() != b.0.len() || a.0.is_empty() {
        return 0.0;
    }
    let (mut dot, mut mag_a, mut mag_b) = (0.0_f32, 0.0_f32, 0.0_f32);
    for (x, y) in a.0.iter().zip(b.0.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom < f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Generate vector embeddings from text.
///
/// Implementations must be `Send + Sync`; the store helpers hold them
/// behind shared references.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into `dimensions()` floats.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying model fails.
    fn embed(&self, text: &str) -> Result<Embedding>;

    /// Embed a batch of texts. The default calls [`embed`](Self::embed)
    /// in a loop; batch-capable providers should override.
    ///
    /// # Errors
    ///
    /// Returns an error if any embedding in the batch fails.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable model name.
    fn model_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Deterministic hashing provider
// ---------------------------------------------------------------------------

/// A deterministic bag-of-words embedding provider.
///
/// Each lowercase token is FNV-hashed into a bucket; the bucket vector is
/// L2-normalized. Identical texts always produce identical embeddings and
/// token overlap produces real similarity signal, which makes this
/// provider usable for tests and for deployments without an embedding
/// model.
pub struct HashEmbeddingProvider {
    dims: usize,
}

impl HashEmbeddingProvider {
    /// Create a provider with the given dimensionality.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            dims: dimensions.max(1),
        }
    }
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self::new(384)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl EmbeddingProvider for HashEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Embedding> {
        let mut raw = vec![0.0_f32; self.dims];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dims as u64) as usize;
            // Half the tokens contribute negatively so that vectors spread
            // across the sphere instead of crowding one orthant.
            let sign = if (hash >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            raw[bucket] += sign;
        }

        let mag: f32 = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
        if mag >= f32::EPSILON {
            for x in &mut raw {
                *x /= mag;
            }
        }
        Ok(Embedding(raw))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        "hash-bow"
    }
}

// ---------------------------------------------------------------------------
// LRU caching wrapper
// ---------------------------------------------------------------------------

/// Memoizes an inner provider's embeddings by exact text.
///
/// Retrieval re-embeds the same situational context repeatedly across
/// simulation turns; the cache makes that free.
pub struct CachingEmbeddingProvider<P> {
    inner: P,
    cache: Mutex<LruCache<String, Embedding>>,
}

impl<P: EmbeddingProvider> CachingEmbeddingProvider<P> {
    /// Wrap a provider with a cache of the given capacity.
    #[must_use]
    pub fn new(inner: P, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached entries.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl<P: EmbeddingProvider> EmbeddingProvider for CachingEmbeddingProvider<P> {
    fn embed(&self, text: &str) -> Result<Embedding> {
        if let Some(hit) = self.cache.lock().get(text) {
            return Ok(hit.clone());
        }
        let embedding = self.inner.embed(text)?;
        self.cache
            .lock()
            .put(text.to_string(), embedding.clone());
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
