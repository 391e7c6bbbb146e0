//! The relationship network — a graph of relationships supporting path
//! queries and compounding path trust.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use uuid::Uuid;

use crate::error::{PersonaError, Result};
use crate::relationship::{Relationship, STRANGER_TRUST};

/// A graph of relationships between individuals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipNetwork {
    /// Relationships keyed by their id.
    pub relationships: std::collections::BTreeMap<Uuid, Relationship>,
}

impl RelationshipNetwork {
    /// Create an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a relationship.
    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.insert(relationship.id, relationship);
    }

    /// Remove a relationship by id. Returns whether anything was removed.
    pub fn remove_relationship(&mut self, relationship_id: Uuid) -> bool {
        self.relationships.remove(&relationship_id).is_some()
    }

    /// Look up a relationship by id.
    #[must_use]
    pub fn get_relationship(&self, relationship_id: Uuid) -> Option<&Relationship> {
        self.relationships.get(&relationship_id)
    }

    /// All relationships involving an individual.
    #[must_use]
    pub fn relationships_of(&self, individual_id: &str) -> Vec<&Relationship> {
        self.relationships
            .values()
            .filter(|r| r.has_individual(individual_id))
            .collect()
    }

    /// The relationship between two specific individuals, if any.
    #[must_use]
    pub fn relationship_between(&self, a: &str, b: &str) -> Option<&Relationship> {
        self.relationships.values().find(|r| r.involves(&[a, b]))
    }

    /// Mutable access to the relationship between two individuals.
    pub fn relationship_between_mut(&mut self, a: &str, b: &str) -> Option<&mut Relationship> {
        self.relationships
            .values_mut()
            .find(|r| r.involves(&[a, b]))
    }

    /// Everyone directly connected to an individual.
    #[must_use]
    pub fn connected_individuals(&self, individual_id: &str) -> BTreeSet<String> {
        let mut connected = BTreeSet::new();
        for relationship in self.relationships_of(individual_id) {
            for id in &relationship.individual_ids {
                if id != individual_id {
                    connected.insert(id.clone());
                }
            }
        }
        connected
    }

    /// Individuals connected to both given individuals.
    #[must_use]
    pub fn common_connections(&self, a: &str, b: &str) -> BTreeSet<String> {
        let connections_a = self.connected_individuals(a);
        let connections_b = self.connected_individuals(b);
        connections_a.intersection(&connections_b).cloned().collect()
    }

    /// Every individual appearing anywhere in the network.
    #[must_use]
    pub fn all_individuals(&self) -> BTreeSet<String> {
        let mut individuals = BTreeSet::new();
        for relationship in self.relationships.values() {
            individuals.extend(relationship.individual_ids.iter().cloned());
        }
        individuals
    }

    /// Directed trust between two individuals: their relationship's value
    /// when one exists, [`STRANGER_TRUST`] otherwise.
    #[must_use]
    pub fn trust_between(&self, from: &str, to: &str) -> f64 {
        self.relationship_between(from, to)
            .and_then(|r| r.get_trust(from, to).ok())
            .unwrap_or(STRANGER_TRUST)
    }

    /// Change directed trust inside the relationship connecting the two
    /// individuals.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::NoPath`] (depth 1) when no relationship
    /// connects them, or the relationship's own participant errors.
    pub fn update_trust(
        &mut self,
        from: &str,
        to: &str,
        delta: f64,
        reason: impl Into<String>,
    ) -> Result<f64> {
        match self.relationship_between_mut(from, to) {
            Some(relationship) => relationship.update_trust(from, to, delta, reason),
            None => Err(PersonaError::NoPath {
                from: from.to_string(),
                to: to.to_string(),
                max_depth: 1,
            }),
        }
    }

    /// Breadth-first shortest path between two individuals.
    ///
    /// `max_depth` bounds the number of edges in the path. A trivial
    /// query (`from == to`) yields a single-element path.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::NoPath`] when no path exists within the
    /// depth limit.
    pub fn find_path(&self, from: &str, to: &str, max_depth: usize) -> Result<Vec<String>> {
        if from == to {
            return Ok(vec![from.to_string()]);
        }

        let no_path = || PersonaError::NoPath {
            from: from.to_string(),
            to: to.to_string(),
            max_depth,
        };

        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<Vec<String>> = VecDeque::new();
        queue.push_back(vec![from.to_string()]);

        while let Some(path) = queue.pop_front() {
            // path.len() - 1 edges so far; expanding adds one more.
            if path.len() > max_depth {
                continue;
            }
            let current = path[path.len() - 1].clone();
            if !visited.insert(current.clone()) {
                continue;
            }

            for connected in self.connected_individuals(&current) {
                if connected == to {
                    let mut found = path.clone();
                    found.push(connected);
                    return Ok(found);
                }
                if !visited.contains(&connected) {
                    let mut next = path.clone();
                    next.push(connected);
                    queue.push_back(next);
                }
            }
        }
        Err(no_path())
    }

    /// Trust along a path of individuals: the product of each edge's
    /// directed trust. Multiplicative decay models compounding
    /// uncertainty over intermediaries — a long chain can never inflate
    /// trust the way an average would. A trivial path scores 1.0; a
    /// single edge scores exactly that edge's trust.
    #[must_use]
    pub fn calculate_path_trust(&self, path: &[String]) -> f64 {
        if path.len() < 2 {
            return 1.0;
        }
        path.windows(2)
            .map(|pair| self.trust_between(&pair[0], &pair[1]))
            .product()
    }

    /// Number of relationships in the network.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    /// Whether the network holds no relationships.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
