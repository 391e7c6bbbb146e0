//! [`EmotionalState`] — the 36-dimensional emotional intensity vector.
//!
//! Values live in `[0.0, 1.0]`. The tracked key set is either the full
//! universe or a restricted subset chosen at construction; it never
//! changes afterwards. Nothing decays implicitly — decay is an explicit
//! operation.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::coefficients::emotion_modifier;
use crate::emotion::{Emotion, EmotionCategory, EMOTION_COUNT};
use crate::error::{PersonaError, Result};
use crate::traits::TraitProfile;

/// Antagonistic emotion pairs: when both are elevated, the stronger
/// suppresses the weaker. Pairs follow the affective circumplex
/// (valence × arousal opposition).
pub const ANTAGONISTIC_PAIRS: [(Emotion, Emotion); 14] = [
    // Joy ↔ Sad
    (Emotion::Cheerful, Emotion::Depressed),
    (Emotion::Hopeful, Emotion::Helpless),
    (Emotion::Excited, Emotion::Apathetic),
    (Emotion::Energetic, Emotion::Bored),
    // Powerful ↔ Fear
    (Emotion::Proud, Emotion::Ashamed),
    (Emotion::Respected, Emotion::Rejected),
    (Emotion::Important, Emotion::Insecure),
    (Emotion::Satisfied, Emotion::Guilty),
    // Peaceful ↔ Anger
    (Emotion::Content, Emotion::Angry),
    (Emotion::Loving, Emotion::Hateful),
    (Emotion::Trusting, Emotion::Hostile),
    (Emotion::Nurturing, Emotion::Critical),
    // Within-category oppositions
    (Emotion::Creative, Emotion::Confused),
    (Emotion::Faithful, Emotion::Selfish),
];

/// The emotional state of an individual.
///
/// Tracks an intensity per emotion, each in `[0.0, 1.0]`. A separate
/// per-emotion mood baseline records the resting point that explicit
/// [`decay`](Self::decay) pulls toward; the baseline shifts slowly across
/// interactions, distinct from transient spikes.
#[derive(Debug, Clone)]
pub struct EmotionalState {
    values: [f64; EMOTION_COUNT],
    tracked: [bool; EMOTION_COUNT],
    mood_baseline: [f64; EMOTION_COUNT],
}

impl EmotionalState {
    /// Create a state tracking all 36 emotions at 0.0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: [0.0; EMOTION_COUNT],
            tracked: [true; EMOTION_COUNT],
            mood_baseline: [0.0; EMOTION_COUNT],
        }
    }

    /// Create a state tracking all 36 emotions at `baseline`.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `baseline` is outside
    /// `[0.0, 1.0]`.
    pub fn with_baseline(baseline: f64) -> Result<Self> {
        validate_value("baseline", baseline)?;
        Ok(Self {
            values: [baseline; EMOTION_COUNT],
            tracked: [true; EMOTION_COUNT],
            mood_baseline: [baseline; EMOTION_COUNT],
        })
    }

    /// Create a state tracking only the given emotions at `baseline`.
    /// Duplicates are collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `baseline` is outside
    /// `[0.0, 1.0]`.
    pub fn with_emotions(emotions: &[Emotion], baseline: f64) -> Result<Self> {
        validate_value("baseline", baseline)?;
        let mut state = Self {
            values: [0.0; EMOTION_COUNT],
            tracked: [false; EMOTION_COUNT],
            mood_baseline: [0.0; EMOTION_COUNT],
        };
        for &emotion in emotions {
            let i = emotion.index();
            state.tracked[i] = true;
            state.values[i] = baseline;
            state.mood_baseline[i] = baseline;
        }
        Ok(state)
    }

    /// Whether an emotion is tracked by this state.
    #[must_use]
    pub fn tracks(&self, emotion: Emotion) -> bool {
        self.tracked[emotion.index()]
    }

    /// Number of tracked emotions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.iter().filter(|t| **t).count()
    }

    /// Whether no emotions are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.tracked.iter().any(|t| *t)
    }

    /// Get the current value of an emotion.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::EmotionNotFound`] if the emotion is not
    /// tracked by this state.
    pub fn get(&self, emotion: Emotion) -> Result<f64> {
        if self.tracks(emotion) {
            Ok(self.values[emotion.index()])
        } else {
            Err(not_tracked(emotion, &self.tracked))
        }
    }

    /// Set a single emotion to an absolute value.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::EmotionNotFound`] if the emotion is not
    /// tracked, [`PersonaError::OutOfRange`] if `value` is outside
    /// `[0.0, 1.0]`.
    pub fn set(&mut self, emotion: Emotion, value: f64) -> Result<()> {
        if !self.tracks(emotion) {
            return Err(not_tracked(emotion, &self.tracked));
        }
        validate_value(emotion.name(), value)?;
        self.values[emotion.index()] = value;
        Ok(())
    }

    /// Set multiple emotions at once.
    ///
    /// Emotions present in `updates` take the given values. When `fill` is
    /// provided, every tracked emotion *not* present in `updates` is set to
    /// `fill`; when `fill` is `None`, unspecified emotions are left
    /// unchanged. All inputs are validated before anything is applied, so
    /// a failed call leaves the state untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::EmotionNotFound`] for untracked emotions and
    /// [`PersonaError::OutOfRange`] for values (or a `fill`) outside
    /// `[0.0, 1.0]`.
    pub fn update(&mut self, updates: &[(Emotion, f64)], fill: Option<f64>) -> Result<()> {
        if let Some(fill) = fill {
            validate_value("fill", fill)?;
        }
        for (emotion, value) in updates {
            if !self.tracks(*emotion) {
                return Err(not_tracked(*emotion, &self.tracked));
            }
            validate_value(emotion.name(), *value)?;
        }

        if let Some(fill) = fill {
            for i in 0..EMOTION_COUNT {
                if self.tracked[i] {
                    self.values[i] = fill;
                }
            }
        }
        for (emotion, value) in updates {
            self.values[emotion.index()] = *value;
        }
        Ok(())
    }

    /// Reset every tracked emotion to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `value` is outside
    /// `[0.0, 1.0]`.
    pub fn reset(&mut self, value: f64) -> Result<()> {
        validate_value("reset", value)?;
        for i in 0..EMOTION_COUNT {
            if self.tracked[i] {
                self.values[i] = value;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// The tracked emotion with the highest value.
    ///
    /// Ties are broken by canonical declaration order: the earliest
    /// declared emotion among those sharing the maximum wins. Returns
    /// `None` for a state tracking no emotions.
    #[must_use]
    pub fn dominant(&self) -> Option<(Emotion, f64)> {
        let mut best: Option<(Emotion, f64)> = None;
        for emotion in Emotion::ALL {
            if !self.tracks(emotion) {
                continue;
            }
            let value = self.values[emotion.index()];
            // Strictly greater, so the earliest-declared emotion keeps ties.
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((emotion, value));
            }
        }
        best
    }

    /// The top `n` tracked emotions by value, descending; ties in
    /// canonical declaration order.
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<(Emotion, f64)> {
        let mut all: Vec<(Emotion, f64)> = Emotion::ALL
            .iter()
            .filter(|e| self.tracks(**e))
            .map(|&e| (e, self.values[e.index()]))
            .collect();
        // Stable sort keeps declaration order among equal values.
        all.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        all.truncate(n);
        all
    }

    /// Whether any tracked emotion (optionally restricted to one category)
    /// exceeds `threshold`.
    #[must_use]
    pub fn any_above(&self, threshold: f64, category: Option<EmotionCategory>) -> bool {
        Emotion::ALL
            .iter()
            .filter(|e| self.tracks(**e))
            .filter(|e| category.is_none_or(|c| e.category() == c))
            .any(|e| self.values[e.index()] > threshold)
    }

    /// Tracked emotions in a category with their values, in canonical
    /// order.
    #[must_use]
    pub fn category_values(&self, category: EmotionCategory) -> Vec<(Emotion, f64)> {
        category
            .emotions()
            .iter()
            .filter(|e| self.tracks(**e))
            .map(|&e| (e, self.values[e.index()]))
            .collect()
    }

    /// Average intensity of the tracked emotions in a category, or 0.0 if
    /// none are tracked.
    #[must_use]
    pub fn category_average(&self, category: EmotionCategory) -> f64 {
        let values = self.category_values(category);
        if values.is_empty() {
            return 0.0;
        }
        values.iter().map(|(_, v)| v).sum::<f64>() / values.len() as f64
    }

    /// Overall emotional valence in `[-1.0, 1.0]`: the intensity-weighted
    /// average of category valences over active emotions. 0.0 for a fully
    /// neutral state.
    #[must_use]
    pub fn valence(&self) -> f64 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for emotion in Emotion::ALL {
            if !self.tracks(emotion) {
                continue;
            }
            let value = self.values[emotion.index()];
            if value > 0.0 {
                weighted += emotion.category().valence() * value;
                total += value;
            }
        }
        if total == 0.0 { 0.0 } else { weighted / total }
    }

    /// Overall emotional arousal in `[0.0, 1.0]`: the intensity-weighted
    /// average of category arousal levels over active emotions.
    #[must_use]
    pub fn arousal(&self) -> f64 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for emotion in Emotion::ALL {
            if !self.tracks(emotion) {
                continue;
            }
            let value = self.values[emotion.index()];
            if value > 0.0 {
                weighted += emotion.category().arousal() * value;
                total += value;
            }
        }
        if total == 0.0 { 0.0 } else { weighted / total }
    }

    // -----------------------------------------------------------------
    // Dynamics
    // -----------------------------------------------------------------

    /// Shift emotions by deltas rather than setting absolutely. Untracked
    /// emotions in `deltas` are silently skipped; results are clamped to
    /// `[0.0, 1.0]`.
    pub fn apply_delta(&mut self, deltas: &[(Emotion, f64)], scale: f64) {
        for (emotion, delta) in deltas {
            let i = emotion.index();
            if !self.tracked[i] {
                continue;
            }
            self.values[i] = (self.values[i] + delta * scale).clamp(0.0, 1.0);
        }
    }

    /// Apply deltas modulated by personality traits.
    ///
    /// For each emotion `e` with base delta `d`, the applied change is
    /// `d * (1 + emotion_modifier(traits, e))` where the modifier sums
    /// `trait_value × coefficient(trait, e)` over every trait affecting
    /// `e`. Results are clamped to `[0.0, 1.0]`; untracked emotions are
    /// silently skipped.
    pub fn apply_trait_modulated_change(
        &mut self,
        deltas: &[(Emotion, f64)],
        traits: &TraitProfile,
    ) {
        for (emotion, delta) in deltas {
            let i = emotion.index();
            if !self.tracked[i] {
                continue;
            }
            let modulated = delta * (1.0 + emotion_modifier(traits, *emotion));
            self.values[i] = (self.values[i] + modulated).clamp(0.0, 1.0);
        }
    }

    /// Suppress contradictory emotions.
    ///
    /// For every antagonistic pair with both members elevated (above 0.1),
    /// the weaker loses `strength * (stronger - weaker)`, clamped at 0.
    /// Mixed emotions survive; true contradictions resolve toward the
    /// dominant pole.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::OutOfRange`] if `strength` is outside
    /// `[0.0, 1.0]`.
    pub fn apply_antagonism(&mut self, strength: f64) -> Result<()> {
        validate_value("strength", strength)?;
        for (a, b) in ANTAGONISTIC_PAIRS {
            if !self.tracks(a) || !self.tracks(b) {
                continue;
            }
            let va = self.values[a.index()];
            let vb = self.values[b.index()];
            if va > 0.1 && vb > 0.1 {
                if va >= vb {
                    let suppression = strength * (va - vb);
                    self.values[b.index()] = (vb - suppression).max(0.0);
                } else {
                    let suppression = strength * (vb - va);
                    self.values[a.index()] = (va - suppression).max(0.0);
                }
            }
        }
        Ok(())
    }

    /// Explicitly decay emotions toward their mood baseline.
    ///
    /// Closes `1 - (1 - rate)^turns` of the gap between each emotion and
    /// its baseline (compound decay). The baseline itself drifts slowly
    /// toward a mild resting value, so long-running moods fade rather than
    /// persist at peak.
    pub fn decay(&mut self, turns_elapsed: u32, rate: f64) {
        if turns_elapsed == 0 {
            return;
        }
        let effective = 1.0 - (1.0 - rate.min(0.99)).powi(turns_elapsed as i32);

        for i in 0..EMOTION_COUNT {
            if !self.tracked[i] {
                continue;
            }
            let current = self.values[i];
            let baseline = self.mood_baseline[i];
            if (current - baseline).abs() < 0.01 {
                self.values[i] = baseline;
                continue;
            }
            self.values[i] = (current + (baseline - current) * effective).clamp(0.0, 1.0);
        }

        // The resting point drifts toward mild contentment (~3% per turn).
        let mood_drift = 1.0 - 0.97_f64.powi(turns_elapsed as i32);
        const RESTING_NEUTRAL: f64 = 0.1;
        for i in 0..EMOTION_COUNT {
            if !self.tracked[i] {
                continue;
            }
            let mb = self.mood_baseline[i];
            if (mb - RESTING_NEUTRAL).abs() > 0.01 {
                self.mood_baseline[i] = mb + (RESTING_NEUTRAL - mb) * mood_drift;
            }
        }
    }

    /// Absorb a fraction of the gap between the current state and the mood
    /// baseline into the baseline. Repeated emotional experiences shift the
    /// resting point.
    pub fn update_mood_baseline(&mut self, learning_rate: f64) {
        for i in 0..EMOTION_COUNT {
            if !self.tracked[i] {
                continue;
            }
            let current = self.values[i];
            let baseline = self.mood_baseline[i];
            self.mood_baseline[i] = baseline + (current - baseline) * learning_rate;
        }
    }

    /// The mood baseline (resting point) for an emotion; 0.0 if untracked.
    #[must_use]
    pub fn mood_baseline(&self, emotion: Emotion) -> f64 {
        if self.tracks(emotion) {
            self.mood_baseline[emotion.index()]
        } else {
            0.0
        }
    }

    /// Mean deviation of current values from the mood baseline. Near 0.0
    /// at emotional equilibrium, toward 1.0 in a highly charged state.
    #[must_use]
    pub fn emotional_volatility(&self) -> f64 {
        let tracked = self.len();
        if tracked == 0 {
            return 0.0;
        }
        let total: f64 = (0..EMOTION_COUNT)
            .filter(|&i| self.tracked[i])
            .map(|i| (self.values[i] - self.mood_baseline[i]).abs())
            .sum();
        total / tracked as f64
    }

    // -----------------------------------------------------------------
    // Snapshot contract
    // -----------------------------------------------------------------

    /// Snapshot contract: tracked emotion name → value map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        Emotion::ALL
            .iter()
            .filter(|e| self.tracks(**e))
            .map(|&e| (e.name().to_string(), self.values[e.index()]))
            .collect()
    }

    /// Build a state from a name → value map. The map's key set becomes
    /// the tracked universe.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::EmotionNotFound`] for unknown names and
    /// [`PersonaError::OutOfRange`] for out-of-range values.
    pub fn from_map(map: &BTreeMap<String, f64>) -> Result<Self> {
        let mut emotions = Vec::with_capacity(map.len());
        for name in map.keys() {
            emotions.push(Emotion::from_name(name)?);
        }
        let mut state = Self::with_emotions(&emotions, 0.0)?;
        for (name, value) in map {
            let emotion = Emotion::from_name(name)?;
            state.set(emotion, *value)?;
        }
        Ok(state)
    }

    /// Iterate over tracked `(emotion, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL
            .iter()
            .filter(|e| self.tracks(**e))
            .map(|&e| (e, self.values[e.index()]))
    }
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for EmotionalState {
    /// Equality compares tracked emotions and their values; the mood
    /// baseline is transient bookkeeping and is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.tracked == other.tracked && self.values == other.values
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let top = self.top_n(3);
        if top.is_empty() || top[0].1 == 0.0 {
            return f.write_str("neutral");
        }
        let parts: Vec<String> = top
            .iter()
            .filter(|(_, v)| *v > 0.0)
            .map(|(e, v)| format!("{e}={v:.2}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

impl Serialize for EmotionalState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (emotion, value) in self.iter() {
            map.serialize_entry(emotion.name(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionalState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = BTreeMap::<String, f64>::deserialize(deserializer)?;
        Self::from_map(&map).map_err(serde::de::Error::custom)
    }
}

fn validate_value(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PersonaError::OutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

fn not_tracked(emotion: Emotion, tracked: &[bool; EMOTION_COUNT]) -> PersonaError {
    let universe = Emotion::ALL
        .iter()
        .filter(|e| tracked[e.index()])
        .map(|e| e.name())
        .collect::<Vec<_>>()
        .join(", ");
    PersonaError::EmotionNotFound {
        name: emotion.name().to_string(),
        universe,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_tracks_all_36_at_zero() {
        let state = EmotionalState::new();
        assert_eq!(state.len(), 36);
        for emotion in Emotion::ALL {
            assert_eq!(state.get(emotion).unwrap(), 0.0);
        }
    }

    #[test]
    fn baseline_constructor_validates() {
        let state = EmotionalState::with_baseline(0.3).unwrap();
        assert_eq!(state.get(Emotion::Anxious).unwrap(), 0.3);
        assert!(EmotionalState::with_baseline(1.1).is_err());
    }

    #[test]
    fn restricted_state_rejects_untracked_access() {
        let mut state =
            EmotionalState::with_emotions(&[Emotion::Anxious, Emotion::Hopeful], 0.0).unwrap();
        assert_eq!(state.len(), 2);
        assert!(state.get(Emotion::Angry).is_err());
        assert!(state.set(Emotion::Angry, 0.5).is_err());
        state.set(Emotion::Anxious, 0.7).unwrap();
        assert_eq!(state.get(Emotion::Anxious).unwrap(), 0.7);
    }

    #[test]
    fn set_rejects_out_of_range() {
        let mut state = EmotionalState::new();
        assert!(state.set(Emotion::Anxious, 1.5).is_err());
        assert!(state.set(Emotion::Anxious, -0.01).is_err());
    }

    #[test]
    fn update_without_fill_leaves_others_unchanged() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Content, 0.4).unwrap();
        state
            .update(&[(Emotion::Anxious, 0.7), (Emotion::Hopeful, 0.3)], None)
            .unwrap();
        assert_eq!(state.get(Emotion::Anxious).unwrap(), 0.7);
        assert_eq!(state.get(Emotion::Content).unwrap(), 0.4);
    }

    #[test]
    fn update_with_fill_sets_unspecified_emotions() {
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
        assert_eq!(state.get(Emotion::Anxious).unwrap(), 0.7);
        assert_eq!(state.get(Emotion::Insecure).unwrap(), 0.6);
        assert_eq!(state.get(Emotion::Helpless).unwrap(), 0.4);
        assert_eq!(state.get(Emotion::Content).unwrap(), 0.1);
    }

    #[test]
    fn empty_update_without_fill_is_noop() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Proud, 0.8).unwrap();
        let before = state.clone();
        state.update(&[], None).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn empty_update_with_fill_sets_everything() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Proud, 0.8).unwrap();
        state.update(&[], Some(0.2)).unwrap();
        for emotion in Emotion::ALL {
            assert!((state.get(emotion).unwrap() - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn failed_update_leaves_state_untouched() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Content, 0.4).unwrap();
        let before = state.clone();
        let result = state.update(&[(Emotion::Anxious, 0.5), (Emotion::Hopeful, 2.0)], Some(0.1));
        assert!(result.is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn dominant_returns_single_peak() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Anxious, 1.0).unwrap();
        assert_eq!(state.dominant().unwrap(), (Emotion::Anxious, 1.0));
    }

    #[test]
    fn dominant_ties_break_by_declaration_order() {
        let mut state = EmotionalState::new();
        // Trusting (index 34) and Hostile (index 0) tied: hostile declared
        // first, so it wins.
        state.set(Emotion::Trusting, 0.6).unwrap();
        state.set(Emotion::Hostile, 0.6).unwrap();
        assert_eq!(state.dominant().unwrap().0, Emotion::Hostile);
    }

    #[test]
    fn top_n_orders_by_value_then_declaration() {
        let mut state = EmotionalState::new();
        state
            .update(
                &[
                    (Emotion::Anxious, 0.9),
                    (Emotion::Hopeful, 0.7),
                    (Emotion::Depressed, 0.7),
                ],
                None,
            )
            .unwrap();
        let top = state.top_n(3);
        assert_eq!(top[0].0, Emotion::Anxious);
        // Depressed (index 8) precedes Hopeful (index 23) in declaration order.
        assert_eq!(top[1].0, Emotion::Depressed);
        assert_eq!(top[2].0, Emotion::Hopeful);
    }

    #[test]
    fn any_above_respects_category_filter() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Anxious, 0.8).unwrap();
        assert!(state.any_above(0.7, None));
        assert!(state.any_above(0.7, Some(EmotionCategory::Fear)));
        assert!(!state.any_above(0.7, Some(EmotionCategory::Joy)));
    }

    #[test]
    fn category_average_divides_by_tracked_count() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Anxious, 0.8).unwrap();
        state.set(Emotion::Helpless, 0.4).unwrap();
        let avg = state.category_average(EmotionCategory::Fear);
        assert!((avg - 0.2).abs() < 1e-12); // (0.8 + 0.4) / 6
    }

    #[test]
    fn valence_sign_follows_active_categories() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Hopeful, 0.9).unwrap();
        assert!(state.valence() > 0.0);

        state.reset(0.0).unwrap();
        state.set(Emotion::Angry, 0.9).unwrap();
        assert!(state.valence() < 0.0);
        assert!(state.valence() >= -1.0);

        let neutral = EmotionalState::new();
        assert_eq!(neutral.valence(), 0.0);
    }

    #[test]
    fn arousal_distinguishes_high_and_low_energy() {
        let mut angry = EmotionalState::new();
        angry.set(Emotion::Angry, 0.9).unwrap();
        let mut calm = EmotionalState::new();
        calm.set(Emotion::Content, 0.9).unwrap();
        assert!(angry.arousal() > calm.arousal());
    }

    #[test]
    fn apply_delta_nudges_and_clamps() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Anxious, 0.4).unwrap();
        state.apply_delta(&[(Emotion::Anxious, 0.3), (Emotion::Hopeful, -0.1)], 1.0);
        assert!((state.get(Emotion::Anxious).unwrap() - 0.7).abs() < 1e-12);
        assert_eq!(state.get(Emotion::Hopeful).unwrap(), 0.0);

        state.apply_delta(&[(Emotion::Anxious, 0.9)], 1.0);
        assert_eq!(state.get(Emotion::Anxious).unwrap(), 1.0);
    }

    #[test]
    fn apply_delta_scale_multiplies() {
        let mut state = EmotionalState::new();
        state.apply_delta(&[(Emotion::Excited, 0.4)], 0.5);
        assert!((state.get(Emotion::Excited).unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn trait_modulation_amplifies_and_dampens() {
        use crate::traits::PersonalityTrait;

        // High apprehension amplifies anxiety deltas.
        let mut anxious_traits = TraitProfile::new();
        anxious_traits.set(PersonalityTrait::Apprehension, 1.0).unwrap();
        anxious_traits
            .set(PersonalityTrait::EmotionalStability, 0.0)
            .unwrap();
        let mut state_a = EmotionalState::new();
        state_a.apply_trait_modulated_change(&[(Emotion::Anxious, 0.3)], &anxious_traits);

        // High stability dampens the same delta.
        let mut stable_traits = TraitProfile::new();
        stable_traits.set(PersonalityTrait::Apprehension, 0.0).unwrap();
        stable_traits
            .set(PersonalityTrait::EmotionalStability, 1.0)
            .unwrap();
        let mut state_b = EmotionalState::new();
        state_b.apply_trait_modulated_change(&[(Emotion::Anxious, 0.3)], &stable_traits);

        assert!(state_a.get(Emotion::Anxious).unwrap() > state_b.get(Emotion::Anxious).unwrap());
    }

    #[test]
    fn antagonism_suppresses_the_weaker_pole() {
        let mut state = EmotionalState::new();
        state
            .update(&[(Emotion::Cheerful, 0.8), (Emotion::Depressed, 0.6)], None)
            .unwrap();
        state.apply_antagonism(0.3).unwrap();
        // Weaker loses strength * (0.8 - 0.6) = 0.06.
        assert!((state.get(Emotion::Depressed).unwrap() - 0.54).abs() < 1e-9);
        assert!((state.get(Emotion::Cheerful).unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn antagonism_ignores_low_intensities_and_validates_strength() {
        let mut state = EmotionalState::new();
        state
            .update(&[(Emotion::Cheerful, 0.8), (Emotion::Depressed, 0.05)], None)
            .unwrap();
        state.apply_antagonism(0.3).unwrap();
        assert!((state.get(Emotion::Depressed).unwrap() - 0.05).abs() < 1e-12);
        assert!(state.apply_antagonism(1.5).is_err());
    }

    #[test]
    fn decay_pulls_toward_baseline() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Anxious, 0.9).unwrap();
        state.decay(3, 0.15);
        let after = state.get(Emotion::Anxious).unwrap();
        assert!(after < 0.9);
        assert!(after > 0.0);

        // Zero turns is a no-op.
        let before = state.clone();
        state.decay(0, 0.15);
        assert_eq!(state, before);
    }

    #[test]
    fn mood_baseline_absorbs_sustained_emotion() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Anxious, 0.8).unwrap();
        for _ in 0..5 {
            state.update_mood_baseline(0.1);
        }
        assert!(state.mood_baseline(Emotion::Anxious) > 0.2);
        assert!(state.emotional_volatility() > 0.0);
    }

    #[test]
    fn map_round_trip_preserves_tracked_set() {
        let mut state =
            EmotionalState::with_emotions(&[Emotion::Anxious, Emotion::Hopeful], 0.0).unwrap();
        state.set(Emotion::Anxious, 0.5).unwrap();
        let map = state.to_map();
        assert_eq!(map.len(), 2);
        let restored = EmotionalState::from_map(&map).unwrap();
        assert_eq!(state, restored);
    }

    #[test]
    fn serde_round_trips_as_name_map() {
        let mut state = EmotionalState::new();
        state.set(Emotion::Loving, 0.75).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"loving\":0.75"));
        let back: EmotionalState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
