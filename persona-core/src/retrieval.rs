//! Text- and context-driven memory retrieval over a [`VectorStore`].
//!
//! These helpers embed the query, over-fetch from the store, apply the
//! trust gate as a post-filter, and truncate. An empty result is a valid
//! outcome, never an error.

use tracing::debug;

use crate::context::SituationalContext;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::memory::MemoryEntry;
use crate::store::{ScoredMemory, VectorStore};

/// Embed a memory's composed text and store the pair.
///
/// # Errors
///
/// Propagates embedding-provider and store errors.
pub fn store_memory<S: VectorStore + ?Sized>(
    store: &mut S,
    provider: &dyn EmbeddingProvider,
    entry: MemoryEntry,
) -> Result<()> {
    let embedding = provider.embed(&entry.to_embedding_text())?;
    store.store(entry, embedding)
}

/// Search memories by free-text query.
///
/// The store is over-fetched (twice the limit) so trust filtering can
/// still fill the requested count; private memories above the
/// requester's trust level are silently omitted.
///
/// # Errors
///
/// Propagates embedding-provider and store errors.
pub fn search_memories<S: VectorStore + ?Sized>(
    store: &S,
    query: &str,
    provider: &dyn EmbeddingProvider,
    limit: usize,
    owner_id: Option<&str>,
    trust_level: f64,
) -> Result<Vec<ScoredMemory>> {
    let query_embedding = provider.embed(query)?;
    let candidates = store.search(&query_embedding, limit.saturating_mul(2), owner_id)?;

    let mut results: Vec<ScoredMemory> = Vec::with_capacity(limit);
    for (entry, similarity) in candidates {
        if !entry.is_accessible(trust_level) {
            continue;
        }
        results.push((entry, similarity));
        if results.len() >= limit {
            break;
        }
    }

    debug!(
        query_len = query.len(),
        hits = results.len(),
        trust = trust_level,
        "memory search complete"
    );
    Ok(results)
}

/// Retrieve memories relevant to a structured situational context.
///
/// The context renders to weighted embedding text (high-weight categories
/// first, so location dominates economic in the similarity signal) and is
/// searched like a text query. An empty context yields no results.
///
/// # Errors
///
/// Propagates embedding-provider and store errors.
pub fn get_relevant_memories<S: VectorStore + ?Sized>(
    store: &S,
    context: &SituationalContext,
    provider: &dyn EmbeddingProvider,
    limit: usize,
    owner_id: Option<&str>,
    trust_level: f64,
) -> Result<Vec<ScoredMemory>> {
    let context_text = context.to_embedding_text();
    if context_text.is_empty() {
        return Ok(Vec::new());
    }
    search_memories(store, &context_text, provider, limit, owner_id, trust_level)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FactCategory;
    use crate::embedding::HashEmbeddingProvider;
    use crate::memory::{IndividualMemory, PrivateMemory};
    use crate::store::InMemoryVectorStore;

    fn setup() -> (InMemoryVectorStore, HashEmbeddingProvider) {
        (InMemoryVectorStore::new(128), HashEmbeddingProvider::new(128))
    }

    #[test]
    fn text_search_finds_topically_close_memories() {
        let (mut store, provider) = setup();
        for description in [
            "had espresso at the corner coffee shop",
            "long hike through the rainy mountains",
            "quiet afternoon reading at the coffee shop",
        ] {
            store_memory(
                &mut store,
                &provider,
                MemoryEntry::Individual(IndividualMemory::new("sarah", description)),
            )
            .unwrap();
        }

        let hits =
            search_memories(&store, "meeting at a coffee shop", &provider, 2, None, 1.0).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].0.description().contains("coffee"));
    }

    #[test]
    fn trust_gate_silently_omits_private_memories() {
        let (mut store, provider) = setup();
        store_memory(
            &mut store,
            &provider,
            MemoryEntry::Individual(IndividualMemory::new("sarah", "open coffee memory")),
        )
        .unwrap();
        store_memory(
            &mut store,
            &provider,
            MemoryEntry::Private(
                PrivateMemory::new("sarah", "secret coffee memory", 0.9).unwrap(),
            ),
        )
        .unwrap();

        let low = search_memories(&store, "coffee memory", &provider, 10, None, 0.5).unwrap();
        assert_eq!(low.len(), 1);

        let high = search_memories(&store, "coffee memory", &provider, 10, None, 0.95).unwrap();
        assert_eq!(high.len(), 2);
    }

    #[test]
    fn limit_is_respected_after_filtering() {
        let (mut store, provider) = setup();
        for i in 0..6 {
            store_memory(
                &mut store,
                &provider,
                MemoryEntry::Individual(IndividualMemory::new(
                    "sarah",
                    &format!("coffee visit number {i}"),
                )),
            )
            .unwrap();
        }
        let hits = search_memories(&store, "coffee visit", &provider, 3, None, 1.0).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn context_retrieval_uses_weighted_text() {
        let (mut store, provider) = setup();
        let mut remembered = SituationalContext::new();
        remembered.add_text(FactCategory::Location, "city", "Miami");
        remembered.add_text(FactCategory::Location, "venue_type", "coffee shop");
        store_memory(
            &mut store,
            &provider,
            MemoryEntry::Individual(
                IndividualMemory::new("sarah", "afternoon in Miami").with_context(remembered),
            ),
        )
        .unwrap();
        store_memory(
            &mut store,
            &provider,
            MemoryEntry::Individual(IndividualMemory::new("sarah", "ski trip in Vermont")),
        )
        .unwrap();

        let mut query = SituationalContext::new();
        query.add_text(FactCategory::Location, "city", "Miami");
        query.add_text(FactCategory::Location, "venue_type", "coffee shop");

        let hits = get_relevant_memories(&store, &query, &provider, 1, None, 1.0).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].0.description().contains("Miami"));
    }

    #[test]
    fn empty_context_yields_no_results() {
        let (store, provider) = setup();
        let hits = get_relevant_memories(
            &store,
            &SituationalContext::new(),
            &provider,
            5,
            None,
            1.0,
        )
        .unwrap();
        assert!(hits.is_empty());
    }
}
