//! Integration tests — end-to-end persona state flows.
//!
//! Covers a full simulation turn (triggers → transition → mask → memory
//! retrieval → trust gating), the persisted round-trip through the
//! SQLite store, and the concrete acceptance scenarios.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use persona_core::{
    calculator::{StateCalculator, StateMode},
    config::PersonaConfig,
    context::{FactCategory, SituationalContext},
    embedding::{CachingEmbeddingProvider, HashEmbeddingProvider},
    get_relevant_memories,
    memory::{IndividualMemory, MemoryEntry, PrivateMemory, SharedMemory},
    network::RelationshipNetwork,
    relationship::Relationship,
    retrieval::{search_memories, store_memory},
    sqlite_store::SqliteVectorStore,
    state::EmotionalState,
    store::{filter_accessible, InMemoryVectorStore, VectorStore},
    stoic_mask,
    traits::{PersonalityTrait, TraitProfile},
    transition::TransitionMatrix,
    trigger::{EmotionRule, EmotionalTrigger, TriggerOp, TriggerResponse},
    Emotion, PersonaError,
};

// ---------------------------------------------------------------------------
// Concrete acceptance scenarios
// ---------------------------------------------------------------------------

#[test]
fn default_state_tracks_36_emotions_at_baseline() {
    let state = EmotionalState::new();
    assert_eq!(state.len(), 36);
    for emotion in Emotion::ALL {
        assert_eq!(state.get(emotion).unwrap(), 0.0);
    }

    let warm = EmotionalState::with_baseline(0.25).unwrap();
    for emotion in Emotion::ALL {
        assert!((warm.get(emotion).unwrap() - 0.25).abs() < 1e-12);
    }
}

#[test]
fn fill_sets_unspecified_emotions() {
    let mut state = EmotionalState::new();
    state
        .update(
            &[
                (Emotion::Anxious, 0.7),
                (Emotion::Insecure, 0.6),
                (Emotion::Helpless, 0.4),
            ],
            Some(0.1),
        )
        .unwrap();
    assert!((state.get(Emotion::Content).unwrap() - 0.1).abs() < 1e-12);
    assert!((state.get(Emotion::Anxious).unwrap() - 0.7).abs() < 1e-12);
}

#[test]
fn symmetric_relationship_trust_scenario() {
    let trust: BTreeMap<String, f64> = [("a".to_string(), 0.8), ("b".to_string(), 0.5)]
        .into_iter()
        .collect();
    let relationship =
        Relationship::with_symmetric_trust(vec!["a".to_string(), "b".to_string()], &trust)
            .unwrap();
    assert!((relationship.get_trust("a", "b").unwrap() - 0.8).abs() < 1e-12);
    assert!((relationship.mutual_trust("a", "b").unwrap() - 0.65).abs() < 1e-12);
}

#[test]
fn anxiety_trigger_threshold_scenario() {
    let trigger = EmotionalTrigger::new(
        "anxiety spike",
        vec![EmotionRule::new(Emotion::Anxious, TriggerOp::Gt, 0.8)],
    );

    let mut state = EmotionalState::new();
    state.set(Emotion::Anxious, 0.9).unwrap();
    assert!(trigger.check(&state).unwrap());

    state.set(Emotion::Anxious, 0.75).unwrap();
    assert!(!trigger.check(&state).unwrap());
}

#[test]
fn private_memory_boundary_scenario() {
    let memory = PrivateMemory::new("sarah", "diagnosis day", 0.8).unwrap();
    assert!(!memory.can_access(0.79));
    assert!(memory.can_access(0.8));
}

// ---------------------------------------------------------------------------
// A full simulation turn
// ---------------------------------------------------------------------------

#[test]
fn full_simulation_turn() {
    // An individual: anxious disposition, high apprehension.
    let mut traits = TraitProfile::new();
    traits.set(PersonalityTrait::Apprehension, 0.9).unwrap();
    traits
        .set(PersonalityTrait::EmotionalStability, 0.2)
        .unwrap();

    let mut state = EmotionalState::new();
    state
        .update(&[(Emotion::Anxious, 0.85), (Emotion::Insecure, 0.5)], None)
        .unwrap();

    // 1. Triggers evaluate against the current state.
    let crisis_trigger = EmotionalTrigger::new(
        "compose under pressure",
        vec![EmotionRule::new(Emotion::Anxious, TriggerOp::Gt, 0.8)],
    )
    .with_response(TriggerResponse::Mask(stoic_mask()));
    assert!(crisis_trigger.check(&state).unwrap());

    // 2. The transition engine advances the underlying state.
    let transitions = TransitionMatrix::default();
    let mut rng = StdRng::seed_from_u64(99);
    let next = transitions.next_state(&state, Some(&traits), &mut rng);
    for (_, value) in next.iter() {
        assert!((0.0..=1.0).contains(&value));
    }

    // 3. The fired mask shapes what is exposed, not what is stored.
    let expressed = crisis_trigger.fire(&next);
    assert!(expressed.get(Emotion::Anxious).unwrap() <= next.get(Emotion::Anxious).unwrap());

    // 4. Relevant memories come back through similarity search.
    let provider = HashEmbeddingProvider::new(128);
    let mut store = InMemoryVectorStore::new(128);
    let mut context = SituationalContext::new().with_description("presentation at the office");
    context.add_text(FactCategory::Location, "venue_type", "office");
    context.add_text(FactCategory::Social, "formality", "professional");

    store_memory(
        &mut store,
        &provider,
        MemoryEntry::Individual(
            IndividualMemory::new("sarah", "botched a presentation at the office last year")
                .with_salience(0.9)
                .unwrap(),
        ),
    )
    .unwrap();
    store_memory(
        &mut store,
        &provider,
        MemoryEntry::Private(
            PrivateMemory::new("sarah", "therapy notes about presentation panic", 0.9).unwrap(),
        ),
    )
    .unwrap();

    // 5. Trust gates private disclosure: a colleague at 0.4 sees only the
    // public memory, a confidant at 0.95 sees both.
    let for_colleague =
        get_relevant_memories(&store, &context, &provider, 5, None, 0.4).unwrap();
    assert_eq!(for_colleague.len(), 1);

    let for_confidant =
        get_relevant_memories(&store, &context, &provider, 5, None, 0.95).unwrap();
    assert_eq!(for_confidant.len(), 2);
}

// ---------------------------------------------------------------------------
// State calculation over a history of turns
// ---------------------------------------------------------------------------

#[test]
fn rolling_history_aggregation() {
    let mut calculator = StateCalculator::new(StateMode::Recent).unwrap();
    for i in 0..5 {
        let mut snapshot = EmotionalState::new();
        snapshot.set(Emotion::Cheerful, f64::from(i) * 0.2).unwrap();
        calculator.add_state(snapshot);
    }

    let representative = calculator.calculated_state().unwrap();
    let value = representative.get(Emotion::Cheerful).unwrap();
    // Recent-weighted: pulled toward the newest (0.8) well above the mean (0.4).
    assert!(value > 0.4);
    assert!(value < 0.8 + 1e-12);
}

// ---------------------------------------------------------------------------
// Trust network end to end
// ---------------------------------------------------------------------------

#[test]
fn trust_network_gates_private_memories_through_paths() {
    let mut network = RelationshipNetwork::new();
    let mut ab = Relationship::new(vec!["alice".to_string(), "bob".to_string()]).unwrap();
    ab.set_trust("alice", "bob", 0.9).unwrap();
    ab.set_trust("bob", "alice", 0.9).unwrap();
    network.add_relationship(ab);
    let mut bc = Relationship::new(vec!["bob".to_string(), "carol".to_string()]).unwrap();
    bc.set_trust("bob", "carol", 0.9).unwrap();
    bc.set_trust("carol", "bob", 0.9).unwrap();
    network.add_relationship(bc);

    // Direct trust is high, but chained trust decays multiplicatively.
    let path = network.find_path("alice", "carol", 6).unwrap();
    assert_eq!(path, vec!["alice", "bob", "carol"]);
    let chained = network.calculate_path_trust(&path);
    assert!((chained - 0.81).abs() < 1e-9);

    // That decayed level decides what carol's secrets alice can see.
    let secret = MemoryEntry::Private(
        PrivateMemory::new("carol", "only for close friends", 0.85).unwrap(),
    );
    let diary = MemoryEntry::Private(PrivateMemory::new("carol", "mild gripe", 0.5).unwrap());
    let accessible = filter_accessible(vec![secret, diary], chained);
    assert_eq!(accessible.len(), 1);
    assert_eq!(accessible[0].description(), "mild gripe");
}

#[test]
fn network_errors_are_structured() {
    let network = RelationshipNetwork::new();
    match network.find_path("a", "b", 3) {
        Err(PersonaError::NoPath { from, to, max_depth }) => {
            assert_eq!(from, "a");
            assert_eq!(to, "b");
            assert_eq!(max_depth, 3);
        }
        other => panic!("expected NoPath, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// SQLite round-trip with shared memories
// ---------------------------------------------------------------------------

#[test]
fn sqlite_store_round_trips_the_data_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persona.db");
    let config = PersonaConfig::default();
    let provider = HashEmbeddingProvider::new(64);

    let mut emotional_snapshot = EmotionalState::new();
    emotional_snapshot.set(Emotion::Cheerful, 0.8).unwrap();

    let mut shared = SharedMemory::new(
        "group dinner downtown",
        vec!["sarah".to_string(), "mike".to_string()],
    );
    shared.set_perspective("sarah", "great food, awkward conversation");
    shared.set_emotional_state("sarah", emotional_snapshot.clone());
    let shared_id = shared.id;

    {
        let mut store = SqliteVectorStore::open(&path, 64, &config.persistence).unwrap();
        store_memory(&mut store, &provider, MemoryEntry::Shared(shared)).unwrap();
        store_memory(
            &mut store,
            &provider,
            MemoryEntry::Individual(
                IndividualMemory::new("sarah", "quiet morning run")
                    .with_emotional_state(emotional_snapshot),
            ),
        )
        .unwrap();
    }

    // Reopen and verify nothing was lost.
    let store = SqliteVectorStore::open(&path, 64, &config.persistence).unwrap();
    assert_eq!(store.count(None), 2);

    let MemoryEntry::Shared(loaded) = store.get(shared_id).unwrap() else {
        panic!("expected shared memory");
    };
    assert_eq!(
        loaded.perspective("sarah"),
        Some("great food, awkward conversation")
    );
    let restored_state = loaded.emotional_state_of("sarah").unwrap();
    assert!((restored_state.get(Emotion::Cheerful).unwrap() - 0.8).abs() < 1e-12);

    // Search works across the reopened store, scoped by participant.
    let hits =
        search_memories(&store, "dinner downtown", &provider, 5, Some("mike"), 1.0).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0.description(), "group dinner downtown");
}

// ---------------------------------------------------------------------------
// Search contract
// ---------------------------------------------------------------------------

#[test]
fn search_respects_limit_and_ordering() {
    let provider = CachingEmbeddingProvider::new(HashEmbeddingProvider::new(96), 64);
    let mut store = InMemoryVectorStore::new(96);
    for i in 0..10 {
        store_memory(
            &mut store,
            &provider,
            MemoryEntry::Individual(IndividualMemory::new(
                "sarah",
                &format!("coffee visit number {i} at the usual cafe"),
            )),
        )
        .unwrap();
    }

    let hits = search_memories(&store, "coffee at the cafe", &provider, 4, None, 1.0).unwrap();
    assert_eq!(hits.len(), 4);
    for window in hits.windows(2) {
        assert!(window[0].1 >= window[1].1 - 1e-6);
    }
}
