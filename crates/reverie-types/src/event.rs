//! Tagged events emitted by the streaming turn pipeline.

use serde::{Deserialize, Serialize};

use crate::cognition::EmotionState;

/// One event in the ordered, finite stream a turn produces.
///
/// Ordering is FIFO as emitted by the producer; `error` is terminal and is
/// never followed by further events. End-of-stream itself carries no payload
/// (the channel simply closes).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// Cognitive state snapshot: at stream start, periodically every fixed
    /// chunk interval, and once more at stream end.
    Meta {
        thought: String,
        emotion: EmotionState,
    },

    /// A partial content delta. Concatenating all deltas in order
    /// reconstructs the full reply.
    Text { delta: String },

    /// Terminal failure notice. No further events follow.
    Error { message: String },
}
