//! Engine configuration.
//!
//! The promotion threshold and importance weights are tuning constants with
//! no derived meaning; they live in configuration rather than code so
//! operators can adjust the gate without a rebuild.

use serde::{Deserialize, Serialize};

/// Tiered-memory tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Minimum importance score for promotion into long-term memory.
    pub promotion_threshold: f32,
    /// How many trailing messages are evaluated for promotion per turn.
    pub promotion_window: usize,
    /// How many memories are retrieved per turn for prompt context.
    pub recall_limit: usize,
    /// Size of the recent window sent to the model and the emotion update.
    pub recent_window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            promotion_threshold: 0.4,
            promotion_window: 5,
            recall_limit: 3,
            recent_window: 10,
        }
    }
}

/// Streaming bridge tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Bounded channel capacity between producer and consumer. The producer
    /// blocks when the consumer falls this many events behind.
    pub channel_capacity: usize,
    /// A `meta` state snapshot is emitted every this many text chunks.
    pub meta_interval: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
            meta_interval: 25,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Model identifier passed to the generation collaborator.
    pub model: String,
    pub memory: MemoryConfig,
    pub stream: StreamConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "llama3".to_string(),
            memory: MemoryConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.memory.promotion_threshold, 0.4);
        assert_eq!(config.memory.promotion_window, 5);
        assert_eq!(config.memory.recall_limit, 3);
        assert_eq!(config.stream.channel_capacity, 32);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
model = "llama3.1"

[memory]
promotion_threshold = 0.6
"#,
        )
        .unwrap();
        assert_eq!(config.model, "llama3.1");
        assert_eq!(config.memory.promotion_threshold, 0.6);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.memory.promotion_window, 5);
        assert_eq!(config.stream.meta_interval, 25);
    }
}
