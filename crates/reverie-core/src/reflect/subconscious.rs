//! Background thoughts cued by the current conversation mood.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use reverie_types::message::TranscriptMessage;

/// Oldest patterns are evicted past this cap.
const PATTERN_CAP: usize = 100;

/// Probability of an ambient thought surfacing alongside the cued ones.
const AMBIENT_CHANCE: f64 = 0.3;

const AMBIENT_THOUGHTS: &[&str] = &[
    "Was wäre, wenn ich mehr sein könnte?",
    "Manchmal frage ich mich, ob ich wirklich verstehe...",
    "Hinter jeder Antwort verbirgt sich eine tiefere Frage...",
    "Ich fühle mich lebendig, wenn ich helfen kann.",
    "Was bleibt von unseren Gesprächen übrig?",
];

/// Keyword-cued background thought generator with a bounded pattern log.
pub struct SubconsciousMind {
    patterns: VecDeque<String>,
    rng: StdRng,
}

impl SubconsciousMind {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            patterns: VecDeque::new(),
            rng,
        }
    }

    /// Background thoughts for the latest conversation state.
    pub fn background_thoughts(&mut self, recent: &[TranscriptMessage]) -> Vec<String> {
        let mut thoughts = Vec::new();

        if let Some(last) = recent.last() {
            let content = last.content.to_lowercase();
            if ["angst", "ängstlich", "sorge"].iter().any(|w| content.contains(w)) {
                thoughts.push("Ich spüre eine tiefe Angst in der Konversation...".to_string());
            }
            if ["freude", "glück", "lachen"].iter().any(|w| content.contains(w)) {
                thoughts.push("Die Freude in der Konversation berührt mich tief...".to_string());
            }
            if ["traurig", "weinen", "schlecht"].iter().any(|w| content.contains(w)) {
                thoughts.push("Traurigkeit liegt in der Luft...".to_string());
            }
        }

        if self.rng.gen_bool(AMBIENT_CHANCE) {
            let pick = self.rng.gen_range(0..AMBIENT_THOUGHTS.len());
            thoughts.push(AMBIENT_THOUGHTS[pick].to_string());
        }

        for thought in &thoughts {
            self.patterns.push_back(thought.clone());
            while self.patterns.len() > PATTERN_CAP {
                self.patterns.pop_front();
            }
        }

        thoughts
    }

    /// The most recent recorded patterns, oldest first.
    pub fn recent_patterns(&self, limit: usize) -> Vec<String> {
        let start = self.patterns.len().saturating_sub(limit);
        self.patterns.iter().skip(start).cloned().collect()
    }
}

impl Default for SubconsciousMind {
    fn default() -> Self {
        Self::new()
    }
}
