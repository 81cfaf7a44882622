//! Cognitive state types: the emotion vector and its snapshots.
//!
//! Emotion dimensions hold values in `[0, 1]`; every mutation goes through
//! a clamping setter so no update sequence can push a dimension out of range.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named emotion dimension.
///
/// Declaration order doubles as the fixed priority order used to break
/// ties when selecting the dominant dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionDimension {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Trust,
    Anticipation,
}

impl EmotionDimension {
    /// All dimensions in tie-break priority order.
    pub const ALL: [EmotionDimension; 8] = [
        EmotionDimension::Joy,
        EmotionDimension::Sadness,
        EmotionDimension::Anger,
        EmotionDimension::Fear,
        EmotionDimension::Surprise,
        EmotionDimension::Disgust,
        EmotionDimension::Trust,
        EmotionDimension::Anticipation,
    ];
}

impl fmt::Display for EmotionDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmotionDimension::Joy => write!(f, "joy"),
            EmotionDimension::Sadness => write!(f, "sadness"),
            EmotionDimension::Anger => write!(f, "anger"),
            EmotionDimension::Fear => write!(f, "fear"),
            EmotionDimension::Surprise => write!(f, "surprise"),
            EmotionDimension::Disgust => write!(f, "disgust"),
            EmotionDimension::Trust => write!(f, "trust"),
            EmotionDimension::Anticipation => write!(f, "anticipation"),
        }
    }
}

impl FromStr for EmotionDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "joy" => Ok(EmotionDimension::Joy),
            "sadness" => Ok(EmotionDimension::Sadness),
            "anger" => Ok(EmotionDimension::Anger),
            "fear" => Ok(EmotionDimension::Fear),
            "surprise" => Ok(EmotionDimension::Surprise),
            "disgust" => Ok(EmotionDimension::Disgust),
            "trust" => Ok(EmotionDimension::Trust),
            "anticipation" => Ok(EmotionDimension::Anticipation),
            other => Err(format!("invalid emotion dimension: '{other}'")),
        }
    }
}

/// The per-session emotion vector: every dimension mapped to a value
/// in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionState(BTreeMap<EmotionDimension, f32>);

impl EmotionState {
    /// Baseline state for a fresh session.
    pub fn initial() -> Self {
        let mut values = BTreeMap::new();
        values.insert(EmotionDimension::Joy, 0.5);
        values.insert(EmotionDimension::Sadness, 0.1);
        values.insert(EmotionDimension::Anger, 0.0);
        values.insert(EmotionDimension::Fear, 0.1);
        values.insert(EmotionDimension::Surprise, 0.3);
        values.insert(EmotionDimension::Disgust, 0.0);
        values.insert(EmotionDimension::Trust, 0.6);
        values.insert(EmotionDimension::Anticipation, 0.4);
        Self(values)
    }

    pub fn get(&self, dimension: EmotionDimension) -> f32 {
        self.0.get(&dimension).copied().unwrap_or(0.0)
    }

    /// Add `delta` to a dimension, clamping the result to `[0, 1]`.
    pub fn adjust(&mut self, dimension: EmotionDimension, delta: f32) {
        let value = (self.get(dimension) + delta).clamp(0.0, 1.0);
        self.0.insert(dimension, value);
    }

    /// The dimension with the maximum value. Ties resolve to the dimension
    /// earliest in [`EmotionDimension::ALL`].
    pub fn dominant(&self) -> EmotionDimension {
        let mut best = EmotionDimension::ALL[0];
        let mut best_value = self.get(best);
        for dimension in EmotionDimension::ALL.into_iter().skip(1) {
            let value = self.get(dimension);
            if value > best_value {
                best = dimension;
                best_value = value;
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmotionDimension, f32)> + '_ {
        self.0.iter().map(|(&dimension, &value)| (dimension, value))
    }
}

impl Default for EmotionState {
    fn default() -> Self {
        Self::initial()
    }
}

/// A point-in-time view of a session's cognitive state, emitted as the
/// payload of `meta` stream events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitiveSnapshot {
    pub emotion: EmotionState,
    pub thought: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_covers_all_dimensions() {
        let state = EmotionState::initial();
        for dimension in EmotionDimension::ALL {
            let value = state.get(dimension);
            assert!((0.0..=1.0).contains(&value), "{dimension} out of range");
        }
    }

    #[test]
    fn test_adjust_clamps_high_and_low() {
        let mut state = EmotionState::initial();
        for _ in 0..100 {
            state.adjust(EmotionDimension::Joy, 0.3);
            state.adjust(EmotionDimension::Anger, -0.5);
        }
        assert_eq!(state.get(EmotionDimension::Joy), 1.0);
        assert_eq!(state.get(EmotionDimension::Anger), 0.0);
    }

    #[test]
    fn test_dominant_initial_is_trust() {
        // Initial baseline: trust = 0.6 is the maximum.
        assert_eq!(EmotionState::initial().dominant(), EmotionDimension::Trust);
    }

    #[test]
    fn test_dominant_tie_breaks_by_priority_order() {
        let mut state = EmotionState::initial();
        // Push sadness to equal trust; joy to equal them too.
        state.adjust(EmotionDimension::Sadness, 0.5);
        state.adjust(EmotionDimension::Joy, 0.1);
        assert_eq!(state.get(EmotionDimension::Joy), 0.6);
        assert_eq!(state.get(EmotionDimension::Sadness), 0.6);
        assert_eq!(state.get(EmotionDimension::Trust), 0.6);
        // Joy comes first in priority order.
        assert_eq!(state.dominant(), EmotionDimension::Joy);
    }

    #[test]
    fn test_emotion_state_serializes_as_map() {
        let state = EmotionState::initial();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"joy\":0.5"));
        assert!(json.contains("\"trust\":0.6"));
        let parsed: EmotionState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_dimension_roundtrip() {
        for dimension in EmotionDimension::ALL {
            let parsed: EmotionDimension = dimension.to_string().parse().unwrap();
            assert_eq!(dimension, parsed);
        }
    }
}
