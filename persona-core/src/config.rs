//! TOML-loadable configuration for the persona engine.

use serde::{Deserialize, Serialize};

use crate::calculator::{StateCalculator, StateMode};
use crate::error::{PersonaError, Result};
use crate::store::InMemoryVectorStore;
use crate::transition::TransitionMatrix;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Emotional-state dynamics settings.
    #[serde(default)]
    pub state: StateConfig,
    /// Memory retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Relationship trust settings.
    #[serde(default)]
    pub trust: TrustConfig,
    /// Persistence settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl PersonaConfig {
    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Configuration`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| PersonaError::Configuration(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether the engine is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
        }
    }
}

/// Emotional-state dynamics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Aggregation mode for the state calculator: average, maximum,
    /// minimum, recent.
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Snapshots kept by the state calculator.
    #[serde(default = "default_10")]
    pub history_size: usize,
    /// Exponential decay factor for recent-weighted aggregation.
    #[serde(default = "default_0_8")]
    pub decay_factor: f64,
    /// Markov transition volatility.
    #[serde(default = "default_0_2")]
    pub volatility: f64,
    /// Suppression strength for antagonistic emotion pairs.
    #[serde(default = "default_0_3")]
    pub antagonism_strength: f64,
    /// Per-turn emotional decay rate toward the mood baseline.
    #[serde(default = "default_0_15")]
    pub decay_rate: f64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            mode: "average".to_string(),
            history_size: 10,
            decay_factor: 0.8,
            volatility: 0.2,
            antagonism_strength: 0.3,
            decay_rate: 0.15,
        }
    }
}

impl StateConfig {
    /// Build a [`StateCalculator`] from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Configuration`] for an unknown mode name
    /// or invalid sizing.
    pub fn build_calculator(&self) -> Result<StateCalculator> {
        let mode = StateMode::from_name(&self.mode)?;
        StateCalculator::with_options(mode, self.history_size, self.decay_factor)
    }

    /// Build a [`TransitionMatrix`] from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] for an invalid volatility.
    pub fn build_transitions(&self) -> Result<TransitionMatrix> {
        TransitionMatrix::new(self.volatility)
    }
}

/// Memory retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Embedding vector dimensions.
    #[serde(default = "default_384")]
    pub embedding_dimensions: usize,
    /// Memories retrieved per query.
    #[serde(default = "default_5")]
    pub top_k: usize,
    /// Store size above which search switches to the ANN index.
    #[serde(default = "default_256")]
    pub brute_force_threshold: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            embedding_dimensions: 384,
            top_k: 5,
            brute_force_threshold: 256,
        }
    }
}

impl RetrievalConfig {
    /// Build an [`InMemoryVectorStore`] from these settings.
    #[must_use]
    pub fn build_store(&self) -> InMemoryVectorStore {
        InMemoryVectorStore::new(self.embedding_dimensions)
            .with_brute_force_threshold(self.brute_force_threshold)
    }
}

/// Relationship trust settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Starting trust inside a new relationship.
    #[serde(default = "default_0_3")]
    pub default_trust: f64,
    /// Trust toward individuals with no relationship.
    #[serde(default = "default_0_1")]
    pub stranger_trust: f64,
    /// Depth limit for relationship path queries.
    #[serde(default = "default_6")]
    pub max_path_depth: usize,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            default_trust: 0.3,
            stranger_trust: 0.1,
            max_path_depth: 6,
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Backend: "sqlite" or "memory".
    #[serde(default = "default_sqlite")]
    pub backend: String,
    /// Use WAL mode for concurrent reads.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_5000")]
    pub busy_timeout_ms: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            wal_mode: true,
            busy_timeout_ms: 5000,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_mode() -> String {
    "average".to_string()
}
fn default_sqlite() -> String {
    "sqlite".to_string()
}
fn default_0_1() -> f64 {
    0.1
}
fn default_0_15() -> f64 {
    0.15
}
fn default_0_2() -> f64 {
    0.2
}
fn default_0_3() -> f64 {
    0.3
}
fn default_0_8() -> f64 {
    0.8
}
fn default_5() -> usize {
    5
}
fn default_6() -> usize {
    6
}
fn default_10() -> usize {
    10
}
fn default_256() -> usize {
    256
}
fn default_384() -> usize {
    384
}
fn default_5000() -> u32 {
    5000
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = PersonaConfig::default();
        assert!(config.general.enabled);
        assert_eq!(config.state.history_size, 10);
        assert_eq!(config.retrieval.embedding_dimensions, 384);
        assert!((config.trust.stranger_trust - 0.1).abs() < 1e-12);
        assert!(config.persistence.wal_mode);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = PersonaConfig::from_toml(
            r#"
            [state]
            mode = "recent"
            history_size = 5

            [retrieval]
            embedding_dimensions = 64
            "#,
        )
        .unwrap();
        assert_eq!(config.state.mode, "recent");
        assert_eq!(config.state.history_size, 5);
        assert!((config.state.decay_factor - 0.8).abs() < 1e-12);
        assert_eq!(config.retrieval.embedding_dimensions, 64);
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        let err = PersonaConfig::from_toml("not [valid").unwrap_err();
        assert!(matches!(err, PersonaError::Configuration(_)));
    }

    #[test]
    fn builders_wire_config_through() {
        let config = PersonaConfig::from_toml(
            r#"
            [state]
            mode = "maximum"
            volatility = 0.4
            "#,
        )
        .unwrap();
        let calculator = config.state.build_calculator().unwrap();
        assert_eq!(calculator.mode(), StateMode::Maximum);
        let transitions = config.state.build_transitions().unwrap();
        assert!((transitions.volatility() - 0.4).abs() < 1e-12);
        let store = config.retrieval.build_store();
        assert_eq!(crate::store::VectorStore::dimensions(&store), 384);
    }

    #[test]
    fn unknown_mode_name_fails_builder() {
        let mut config = StateConfig::default();
        config.mode = "psychic".to_string();
        assert!(config.build_calculator().is_err());
    }
}
