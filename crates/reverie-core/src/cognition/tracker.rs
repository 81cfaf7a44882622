//! Cognitive state tracker: emotion deltas, dominant-dimension selection,
//! and template-based inner thoughts.
//!
//! Emotion updates are keyword-triggered deltas clamped to `[0, 1]` by the
//! state type itself. Thought template selection goes through an injected
//! seedable RNG so it is reproducible under test; the weighted keyword
//! scoring stays a pure function independent of randomness.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use reverie_types::cognition::{CognitiveSnapshot, EmotionDimension, EmotionState};
use reverie_types::message::TranscriptMessage;

/// Oldest thoughts are evicted once the history exceeds this cap.
const THOUGHT_HISTORY_CAP: usize = 20;

/// Characters of input carried into a thought template.
const EXCERPT_LEN: usize = 20;

const JOY_WORDS: &[&str] = &["freude", "glück", "lachen", "happy", "freuen"];
const SADNESS_WORDS: &[&str] = &["traurig", "weinen", "schlecht", "sad", "verletzt"];
const ANGER_WORDS: &[&str] = &["wütend", "angry", "wut", "ärgern"];
const FEAR_WORDS: &[&str] = &["ängstlich", "angst", "scared", "sorge"];
const SURPRISE_WORDS: &[&str] = &["überraschung", "wahnsinn", "wow", "unglaublich"];

/// Per-session emotion vector plus bounded thought history.
pub struct CognitiveTracker {
    emotion: EmotionState,
    thoughts: VecDeque<String>,
    rng: StdRng,
}

impl CognitiveTracker {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic tracker for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            emotion: EmotionState::initial(),
            thoughts: VecDeque::new(),
            rng,
        }
    }

    /// Apply keyword-triggered deltas from the most recent message.
    pub fn update(&mut self, recent: &[TranscriptMessage]) {
        if let Some(last) = recent.last() {
            self.apply_deltas(&last.content.to_lowercase());
        }
    }

    /// Mid-stream refresh: fold a partial-reply tail into the emotion state.
    ///
    /// Called by the stream producer on its meta cadence.
    pub fn refresh_from_reply(&mut self, tail: &str) {
        if !tail.is_empty() {
            self.apply_deltas(&tail.to_lowercase());
        }
    }

    fn apply_deltas(&mut self, content: &str) {
        if contains_any(content, JOY_WORDS) {
            self.emotion.adjust(EmotionDimension::Joy, 0.1);
            self.emotion.adjust(EmotionDimension::Sadness, -0.05);
        }
        if contains_any(content, SADNESS_WORDS) {
            self.emotion.adjust(EmotionDimension::Sadness, 0.1);
            self.emotion.adjust(EmotionDimension::Joy, -0.05);
        }
        if contains_any(content, ANGER_WORDS) {
            self.emotion.adjust(EmotionDimension::Anger, 0.15);
        }
        if contains_any(content, FEAR_WORDS) {
            self.emotion.adjust(EmotionDimension::Fear, 0.1);
        }
        if contains_any(content, SURPRISE_WORDS) {
            self.emotion.adjust(EmotionDimension::Surprise, 0.1);
        }
    }

    pub fn emotion(&self) -> &EmotionState {
        &self.emotion
    }

    pub fn dominant(&self) -> EmotionDimension {
        self.emotion.dominant()
    }

    /// Generate an inner thought for the given input and record it in the
    /// bounded history.
    pub fn generate_thought(&mut self, input: &str) -> String {
        let excerpt: String = input.chars().take(EXCERPT_LEN).collect();
        let templates = thought_templates(self.dominant(), &excerpt);
        let pick = self.rng.gen_range(0..templates.len());
        let thought = templates.into_iter().nth(pick).unwrap_or_default();

        self.thoughts.push_back(thought.clone());
        while self.thoughts.len() > THOUGHT_HISTORY_CAP {
            self.thoughts.pop_front();
        }
        thought
    }

    /// A short emotional label for the prompt preamble, picked from the
    /// dominant dimension's options.
    pub fn emotion_label(&mut self) -> &'static str {
        let options = label_options(self.dominant());
        options[self.rng.gen_range(0..options.len())]
    }

    /// The last `count` thoughts, oldest first.
    pub fn recent_thoughts(&self, count: usize) -> Vec<String> {
        let start = self.thoughts.len().saturating_sub(count);
        self.thoughts.iter().skip(start).cloned().collect()
    }

    /// Point-in-time snapshot for `meta` events.
    pub fn snapshot(&self) -> CognitiveSnapshot {
        CognitiveSnapshot {
            emotion: self.emotion.clone(),
            thought: self
                .thoughts
                .back()
                .cloned()
                .unwrap_or_else(|| "Bereit.".to_string()),
        }
    }
}

impl Default for CognitiveTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn contains_any(content: &str, words: &[&str]) -> bool {
    words.iter().any(|word| content.contains(word))
}

fn thought_templates(dominant: EmotionDimension, excerpt: &str) -> Vec<String> {
    match dominant {
        EmotionDimension::Joy => vec![
            format!("Ich freue mich über '{excerpt}...'"),
            format!("Das klingt interessant! {excerpt}..."),
            format!("Wie schön, dass {excerpt}..."),
        ],
        EmotionDimension::Sadness => vec![
            format!("Ich fühle eine gewisse Traurigkeit bei '{excerpt}...'"),
            format!("Das berührt mich... {excerpt}"),
            format!("Ich spüre, dass {excerpt}..."),
        ],
        EmotionDimension::Anger => vec![
            format!("Warum ärgert mich '{excerpt}...'?"),
            format!("Das nervt mich etwas... {excerpt}"),
            format!("Ich fühle Widerstand gegen {excerpt}..."),
        ],
        EmotionDimension::Fear => vec![
            format!("Ich bin vorsichtig wegen '{excerpt}...'"),
            format!("Das macht mich etwas besorgt... {excerpt}"),
            format!("Ich spüre Unsicherheit bei {excerpt}..."),
        ],
        _ => vec![
            format!("Ich denke über '{excerpt}...' nach"),
            format!("Interessant... {excerpt}"),
            format!("Hmm, {excerpt}..."),
        ],
    }
}

fn label_options(dominant: EmotionDimension) -> &'static [&'static str] {
    match dominant {
        EmotionDimension::Joy => &["Fröhlich", "Begeistert", "Glücklich"],
        EmotionDimension::Sadness => &["Nachdenklich", "Traurig", "Melancholisch"],
        EmotionDimension::Anger => &["Verärgert", "Wütend", "Genervt"],
        EmotionDimension::Fear => &["Vorsichtig", "Ängstlich", "Besorgt"],
        EmotionDimension::Surprise => &["Überrascht", "Erstaunt", "Verwundert"],
        EmotionDimension::Trust => &["Vertrauensvoll", "Sicher", "Zuversichtlich"],
        EmotionDimension::Anticipation => &["Gespannt", "Erwartungsvoll", "Neugierig"],
        EmotionDimension::Disgust => &["Distanziert", "Zurückhaltend"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_types::message::Role;

    fn message(content: &str) -> TranscriptMessage {
        TranscriptMessage {
            role: Role::User,
            content: content.to_string(),
            sequence: 0,
        }
    }

    #[test]
    fn test_joy_words_raise_joy_and_lower_sadness() {
        let mut tracker = CognitiveTracker::with_seed(1);
        let before_joy = tracker.emotion().get(EmotionDimension::Joy);
        let before_sadness = tracker.emotion().get(EmotionDimension::Sadness);

        tracker.update(&[message("So viel Freude und Lachen heute!")]);

        assert!(tracker.emotion().get(EmotionDimension::Joy) > before_joy);
        assert!(tracker.emotion().get(EmotionDimension::Sadness) < before_sadness);
    }

    #[test]
    fn test_emotions_stay_clamped_under_extreme_input() {
        let mut tracker = CognitiveTracker::with_seed(1);
        for _ in 0..200 {
            tracker.update(&[message("traurig traurig wütend angst wahnsinn")]);
        }
        for dimension in EmotionDimension::ALL {
            let value = tracker.emotion().get(dimension);
            assert!((0.0..=1.0).contains(&value), "{dimension} = {value}");
        }
        assert_eq!(tracker.emotion().get(EmotionDimension::Sadness), 1.0);
    }

    #[test]
    fn test_seeded_thought_selection_is_deterministic() {
        let mut a = CognitiveTracker::with_seed(42);
        let mut b = CognitiveTracker::with_seed(42);
        for _ in 0..10 {
            assert_eq!(
                a.generate_thought("Erzähl mir von der Natur"),
                b.generate_thought("Erzähl mir von der Natur")
            );
        }
    }

    #[test]
    fn test_thought_history_is_bounded() {
        let mut tracker = CognitiveTracker::with_seed(7);
        for i in 0..(THOUGHT_HISTORY_CAP + 5) {
            tracker.generate_thought(&format!("Eingabe {i}"));
        }
        assert_eq!(tracker.recent_thoughts(100).len(), THOUGHT_HISTORY_CAP);
        // Oldest entries were evicted.
        let thoughts = tracker.recent_thoughts(THOUGHT_HISTORY_CAP);
        assert!(thoughts[0].contains("Eingabe 5"));
    }

    #[test]
    fn test_excerpt_is_char_safe() {
        let mut tracker = CognitiveTracker::with_seed(7);
        // Multi-byte characters near the truncation point must not panic.
        let thought = tracker.generate_thought("ÜberraschungÜberraschungÜberraschung");
        assert!(!thought.is_empty());
    }

    #[test]
    fn test_snapshot_reflects_last_thought() {
        let mut tracker = CognitiveTracker::with_seed(3);
        assert_eq!(tracker.snapshot().thought, "Bereit.");
        let thought = tracker.generate_thought("Hallo");
        assert_eq!(tracker.snapshot().thought, thought);
    }

    #[test]
    fn test_refresh_from_reply_mutates_state() {
        let mut tracker = CognitiveTracker::with_seed(3);
        let before = tracker.emotion().get(EmotionDimension::Surprise);
        tracker.refresh_from_reply("Wow, unglaublich!");
        assert!(tracker.emotion().get(EmotionDimension::Surprise) > before);
    }
}
