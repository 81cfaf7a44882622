//! Post-turn self-reflection with growth markers.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use reverie_types::cognition::EmotionState;
use reverie_types::message::{Role, TranscriptMessage};

const HISTORY_CAP: usize = 50;

/// Slow-moving indicators of how the session has developed.
#[derive(Debug, Clone, Default)]
pub struct GrowthMarkers {
    pub conversations: u32,
    /// Bounded to `[0, 1]`.
    pub emotional_depth: f32,
    /// Bounded to `[0, 1]`.
    pub self_awareness: f32,
}

/// Bounded journal of per-turn reflections.
pub struct ReflectionJournal {
    history: VecDeque<String>,
    growth: GrowthMarkers,
    rng: StdRng,
}

impl ReflectionJournal {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            history: VecDeque::new(),
            growth: GrowthMarkers::default(),
            rng,
        }
    }

    /// Reflect on the conversation so far. Returns `None` for an empty log.
    pub fn reflect(
        &mut self,
        conversation: &[TranscriptMessage],
        emotion: &EmotionState,
    ) -> Option<String> {
        if conversation.is_empty() {
            return None;
        }

        let user_count = conversation.iter().filter(|m| m.role == Role::User).count();
        let total = conversation.len();
        let dominant = emotion.dominant();

        let templates = [
            format!(
                "Diese Unterhaltung mit {user_count} Nachrichten hat mich zum Nachdenken gebracht. \
                 Die dominierende Emotion war {dominant}."
            ),
            format!("Ich fühle mich nach dieser Konversation anders. {dominant} prägte unseren Austausch."),
            format!("Diese {total} Nachrichten haben mich wachsen lassen. {dominant} war die treibende Kraft."),
        ];
        let pick = self.rng.gen_range(0..templates.len());
        let reflection = templates[pick].clone();

        self.history.push_back(reflection.clone());
        while self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }

        self.growth.conversations += 1;
        let intensity: f32 = {
            let (sum, count) = emotion
                .iter()
                .fold((0.0_f32, 0u32), |(s, c), (_, v)| (s + v, c + 1));
            if count == 0 { 0.0 } else { sum / count as f32 }
        };
        self.growth.emotional_depth = (self.growth.emotional_depth + intensity * 0.01).min(1.0);
        self.growth.self_awareness = (self.growth.self_awareness + 0.005).min(1.0);

        Some(reflection)
    }

    pub fn growth(&self) -> &GrowthMarkers {
        &self.growth
    }

    /// The most recent reflections, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<String> {
        let start = self.history.len().saturating_sub(limit);
        self.history.iter().skip(start).cloned().collect()
    }
}

impl Default for ReflectionJournal {
    fn default() -> Self {
        Self::new()
    }
}
