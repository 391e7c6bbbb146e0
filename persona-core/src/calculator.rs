//! [`StateCalculator`] — aggregates a rolling history of emotional state
//! snapshots into one representative state.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::error::{PersonaError, Result};
use crate::state::EmotionalState;

/// Strategy for combining a history of states into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StateMode {
    /// Per-emotion arithmetic mean across the history.
    #[default]
    Average,
    /// Per-emotion maximum across the history.
    Maximum,
    /// Per-emotion minimum across the history.
    Minimum,
    /// Exponentially-weighted average, most-recent sample weighted highest.
    Recent,
    /// Delegate to a caller-supplied function.
    Custom,
}

impl StateMode {
    /// Parse a mode from its lowercase name. `custom` is not parseable —
    /// a custom calculator needs a function, not a config string.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Configuration`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "average" => Ok(Self::Average),
            "maximum" => Ok(Self::Maximum),
            "minimum" => Ok(Self::Minimum),
            "recent" => Ok(Self::Recent),
            other => Err(PersonaError::Configuration(format!(
                "unknown state mode '{other}'. Valid modes: average, maximum, minimum, recent"
            ))),
        }
    }

    /// Human-readable description of the mode.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Average => "Calculate average intensity for each emotion across history",
            Self::Maximum => "Use maximum intensity for each emotion across history",
            Self::Minimum => "Use minimum intensity for each emotion across history",
            Self::Recent => "Weight recent states more heavily using exponential decay",
            Self::Custom => "Use a custom calculation function",
        }
    }
}

/// Caller-supplied aggregation for [`StateMode::Custom`].
pub type CustomCalculator = Box<dyn Fn(&[EmotionalState]) -> EmotionalState + Send + Sync>;

/// Maintains a bounded history of emotional states and computes a single
/// representative state from it.
///
/// The history is a ring buffer: once `history_size` snapshots are held,
/// adding another evicts the oldest.
pub struct StateCalculator {
    mode: StateMode,
    history_size: usize,
    decay_factor: f64,
    custom: Option<CustomCalculator>,
    history: VecDeque<EmotionalState>,
}

impl StateCalculator {
    /// Default history capacity.
    pub const DEFAULT_HISTORY_SIZE: usize = 10;

    /// Default exponential decay factor for [`StateMode::Recent`].
    pub const DEFAULT_DECAY_FACTOR: f64 = 0.8;

    /// Create a calculator for a non-custom mode with default sizing.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Configuration`] if `mode` is
    /// [`StateMode::Custom`] — use [`Self::with_custom`] for that.
    pub fn new(mode: StateMode) -> Result<Self> {
        Self::with_options(mode, Self::DEFAULT_HISTORY_SIZE, Self::DEFAULT_DECAY_FACTOR)
    }

    /// Create a calculator with explicit history size and decay factor.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Configuration`] for
    /// [`StateMode::Custom`] without a function, `history_size < 1`, or a
    /// decay factor outside `(0.0, 1.0]`.
    pub fn with_options(mode: StateMode, history_size: usize, decay_factor: f64) -> Result<Self> {
        if mode == StateMode::Custom {
            return Err(PersonaError::Configuration(
                "custom_function is required when mode is Custom".to_string(),
            ));
        }
        Self::build(mode, history_size, decay_factor, None)
    }

    /// Create a [`StateMode::Custom`] calculator with the given function.
    ///
    /// The function receives the history oldest-first and must return a
    /// state whose values all lie in `[0.0, 1.0]`; the engine validates
    /// the result on every calculation.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Configuration`] for invalid sizing options.
    pub fn with_custom(
        custom: CustomCalculator,
        history_size: usize,
        decay_factor: f64,
    ) -> Result<Self> {
        Self::build(StateMode::Custom, history_size, decay_factor, Some(custom))
    }

    fn build(
        mode: StateMode,
        history_size: usize,
        decay_factor: f64,
        custom: Option<CustomCalculator>,
    ) -> Result<Self> {
        if history_size < 1 {
            return Err(PersonaError::Configuration(format!(
                "history_size must be at least 1, got {history_size}"
            )));
        }
        if !(decay_factor > 0.0 && decay_factor <= 1.0) {
            return Err(PersonaError::Configuration(format!(
                "decay_factor must be in (0.0, 1.0], got {decay_factor}"
            )));
        }
        Ok(Self {
            mode,
            history_size,
            decay_factor,
            custom,
            history: VecDeque::with_capacity(history_size),
        })
    }

    /// The configured calculation mode.
    #[must_use]
    pub fn mode(&self) -> StateMode {
        self.mode
    }

    /// The maximum history size.
    #[must_use]
    pub fn history_size(&self) -> usize {
        self.history_size
    }

    /// The decay factor used by [`StateMode::Recent`].
    #[must_use]
    pub fn decay_factor(&self) -> f64 {
        self.decay_factor
    }

    /// Append a snapshot, evicting the oldest once capacity is reached.
    pub fn add_state(&mut self, state: EmotionalState) {
        self.history.push_back(state);
        while self.history.len() > self.history_size {
            self.history.pop_front();
        }
    }

    /// Drop all history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// The current history, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<EmotionalState> {
        self.history.iter().cloned().collect()
    }

    /// Number of snapshots currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Compute the representative state from the internal history.
    ///
    /// An **empty history is not an error**: it yields the all-zero
    /// baseline state tracking the full universe.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Configuration`] if a custom function
    /// produced a state violating the `[0.0, 1.0]` invariant.
    pub fn calculated_state(&self) -> Result<EmotionalState> {
        if self.history.is_empty() {
            return Ok(EmotionalState::new());
        }
        let history: Vec<EmotionalState> = self.history.iter().cloned().collect();
        self.calculate(&history)
    }

    /// Compute a representative state from an explicit history
    /// (oldest first) using the configured mode. An empty history yields
    /// the all-zero baseline state.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Configuration`] if a custom function
    /// produced a state violating the `[0.0, 1.0]` invariant.
    pub fn calculate(&self, history: &[EmotionalState]) -> Result<EmotionalState> {
        if history.is_empty() {
            return Ok(EmotionalState::new());
        }
        match self.mode {
            StateMode::Average => Ok(fold_history(history, |values| {
                values.iter().sum::<f64>() / values.len() as f64
            })),
            StateMode::Maximum => Ok(fold_history(history, |values| {
                values.iter().copied().fold(f64::MIN, f64::max)
            })),
            StateMode::Minimum => Ok(fold_history(history, |values| {
                values.iter().copied().fold(f64::MAX, f64::min)
            })),
            StateMode::Recent => Ok(self.calculate_recent(history)),
            StateMode::Custom => {
                let Some(custom) = &self.custom else {
                    return Err(PersonaError::Configuration(
                        "custom_function is required when mode is Custom".to_string(),
                    ));
                };
                let result = custom(history);
                validate_state(&result)?;
                Ok(result)
            }
        }
    }

    /// Exponentially-weighted average: a sample of age `a` (0 = newest)
    /// gets weight `decay_factor^a`, normalized to sum to 1.
    fn calculate_recent(&self, history: &[EmotionalState]) -> EmotionalState {
        let n = history.len();
        let weights: Vec<f64> = (0..n)
            .map(|i| self.decay_factor.powi((n - 1 - i) as i32))
            .collect();
        let total_weight: f64 = weights.iter().sum();

        let mut result = restricted_like(&history[0]);
        for emotion in Emotion::ALL {
            if !result.tracks(emotion) {
                continue;
            }
            let weighted_sum: f64 = history
                .iter()
                .zip(weights.iter())
                .filter(|(state, _)| state.tracks(emotion))
                .map(|(state, w)| state.get(emotion).unwrap_or(0.0) * w)
                .sum();
            if total_weight > 0.0 {
                let _ = result.set(emotion, (weighted_sum / total_weight).clamp(0.0, 1.0));
            }
        }
        result
    }
}

impl fmt::Debug for StateCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCalculator")
            .field("mode", &self.mode)
            .field("history", &format!("{}/{}", self.history.len(), self.history_size))
            .field("decay_factor", &self.decay_factor)
            .finish_non_exhaustive()
    }
}

/// A zeroed state tracking the same emotions as `template`.
fn restricted_like(template: &EmotionalState) -> EmotionalState {
    let emotions: Vec<Emotion> = template.iter().map(|(e, _)| e).collect();
    // Cannot fail: baseline 0.0 is always valid.
    EmotionalState::with_emotions(&emotions, 0.0).unwrap_or_default()
}

/// Per-emotion fold over the history, using the first state's tracked set.
fn fold_history<F: Fn(&[f64]) -> f64>(history: &[EmotionalState], combine: F) -> EmotionalState {
    let mut result = restricted_like(&history[0]);
    for emotion in Emotion::ALL {
        if !result.tracks(emotion) {
            continue;
        }
        let values: Vec<f64> = history
            .iter()
            .filter(|s| s.tracks(emotion))
            .map(|s| s.get(emotion).unwrap_or(0.0))
            .collect();
        if !values.is_empty() {
            let _ = result.set(emotion, combine(&values).clamp(0.0, 1.0));
        }
    }
    result
}

fn validate_state(state: &EmotionalState) -> Result<()> {
    for (emotion, value) in state.iter() {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(PersonaError::Configuration(format!(
                "custom calculator produced invalid value {value} for '{emotion}'"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(emotion: Emotion, value: f64) -> EmotionalState {
        let mut state = EmotionalState::new();
        state.set(emotion, value).unwrap();
        state
    }

    #[test]
    fn custom_mode_requires_function() {
        let err = StateCalculator::new(StateMode::Custom).unwrap_err();
        assert!(matches!(err, PersonaError::Configuration(_)));
    }

    #[test]
    fn sizing_options_are_validated() {
        assert!(StateCalculator::with_options(StateMode::Average, 0, 0.8).is_err());
        assert!(StateCalculator::with_options(StateMode::Average, 5, 0.0).is_err());
        assert!(StateCalculator::with_options(StateMode::Average, 5, 1.5).is_err());
    }

    #[test]
    fn empty_history_yields_baseline_zero_state() {
        let calc = StateCalculator::new(StateMode::Average).unwrap();
        let state = calc.calculated_state().unwrap();
        assert_eq!(state.len(), 36);
        assert_eq!(state.get(Emotion::Anxious).unwrap(), 0.0);
    }

    #[test]
    fn average_mode_means_each_emotion() {
        let mut calc = StateCalculator::new(StateMode::Average).unwrap();
        calc.add_state(state_with(Emotion::Anxious, 0.8));
        calc.add_state(state_with(Emotion::Anxious, 0.4));
        let result = calc.calculated_state().unwrap();
        assert!((result.get(Emotion::Anxious).unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn maximum_and_minimum_modes() {
        let history = vec![
            state_with(Emotion::Hopeful, 0.2),
            state_with(Emotion::Hopeful, 0.9),
        ];
        let max = StateCalculator::new(StateMode::Maximum)
            .unwrap()
            .calculate(&history)
            .unwrap();
        assert!((max.get(Emotion::Hopeful).unwrap() - 0.9).abs() < 1e-12);

        let min = StateCalculator::new(StateMode::Minimum)
            .unwrap()
            .calculate(&history)
            .unwrap();
        assert!((min.get(Emotion::Hopeful).unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn recent_mode_weights_newest_highest() {
        let calc = StateCalculator::with_options(StateMode::Recent, 10, 0.5).unwrap();
        let history = vec![
            state_with(Emotion::Anxious, 0.0),
            state_with(Emotion::Anxious, 1.0),
        ];
        let result = calc.calculate(&history).unwrap();
        // Weights: old 0.5, new 1.0 → (0*0.5 + 1*1.0) / 1.5
        assert!((result.get(Emotion::Anxious).unwrap() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn ring_buffer_evicts_oldest() {
        let mut calc = StateCalculator::with_options(StateMode::Maximum, 2, 0.8).unwrap();
        calc.add_state(state_with(Emotion::Angry, 1.0));
        calc.add_state(state_with(Emotion::Angry, 0.2));
        calc.add_state(state_with(Emotion::Angry, 0.3));
        assert_eq!(calc.len(), 2);
        // The 1.0 snapshot was evicted.
        let result = calc.calculated_state().unwrap();
        assert!((result.get(Emotion::Angry).unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn custom_mode_delegates_and_validates() {
        let calc = StateCalculator::with_custom(
            Box::new(|history| history[history.len() - 1].clone()),
            10,
            0.8,
        )
        .unwrap();
        let history = vec![
            state_with(Emotion::Proud, 0.4),
            state_with(Emotion::Proud, 0.9),
        ];
        let result = calc.calculate(&history).unwrap();
        assert!((result.get(Emotion::Proud).unwrap() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn restricted_histories_keep_their_universe() {
        let mut calc = StateCalculator::new(StateMode::Average).unwrap();
        let mut s =
            EmotionalState::with_emotions(&[Emotion::Anxious, Emotion::Hopeful], 0.0).unwrap();
        s.set(Emotion::Anxious, 0.6).unwrap();
        calc.add_state(s);
        let result = calc.calculated_state().unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.get(Emotion::Angry).is_err());
    }

    #[test]
    fn clear_history_resets() {
        let mut calc = StateCalculator::new(StateMode::Average).unwrap();
        calc.add_state(EmotionalState::new());
        calc.clear_history();
        assert!(calc.is_empty());
    }
}
