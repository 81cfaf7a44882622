//! Topic learning ledger.
//!
//! Tracks which topics a session's conversations touch, a bounded
//! understanding score per topic, and the insights derived from them.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use reverie_types::message::TranscriptMessage;

const INSIGHT_CAP: usize = 50;
const UNDERSTANDING_STEP: f32 = 0.1;

const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("technologie", &["computer", "ki", "künstliche intelligenz", "programmieren"]),
    ("philosophie", &["sinn", "existenz", "bewusstsein", "denken"]),
    ("emotionen", &["fühle", "emotion", "traurig", "freude", "ängstlich"]),
    ("beziehungen", &["freund", "familie", "liebe", "verbindung"]),
    ("lernen", &["lernen", "wissen", "verstehen", "begreifen"]),
];

/// Accumulated knowledge about one topic.
#[derive(Debug, Clone)]
pub struct TopicKnowledge {
    pub discussions: u32,
    /// Bounded to `[0, 1]`.
    pub understanding: f32,
    pub last_updated: DateTime<Utc>,
}

/// Per-session learning state.
#[derive(Debug, Default)]
pub struct LearningLedger {
    knowledge: BTreeMap<String, TopicKnowledge>,
    insights: VecDeque<String>,
}

impl LearningLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a conversation into the ledger.
    pub fn learn_from(&mut self, conversation: &[TranscriptMessage]) {
        let topics = extract_topics(conversation);

        for topic in &topics {
            let entry = self
                .knowledge
                .entry(topic.clone())
                .or_insert_with(|| TopicKnowledge {
                    discussions: 0,
                    understanding: 0.0,
                    last_updated: Utc::now(),
                });
            entry.discussions += 1;
            entry.understanding = (entry.understanding + UNDERSTANDING_STEP).min(1.0);
            entry.last_updated = Utc::now();
        }

        if let Some(first) = topics.first() {
            self.insights.push_back(format!(
                "Durch Gespräche über {first} verstehe ich menschliche Perspektiven besser."
            ));
            while self.insights.len() > INSIGHT_CAP {
                self.insights.pop_front();
            }
        }
    }

    pub fn knowledge(&self, topic: &str) -> Option<&TopicKnowledge> {
        self.knowledge.get(topic)
    }

    pub fn known_topics(&self) -> Vec<&str> {
        self.knowledge.keys().map(String::as_str).collect()
    }

    /// The most recent insights, oldest first.
    pub fn recent_insights(&self, limit: usize) -> Vec<String> {
        let start = self.insights.len().saturating_sub(limit);
        self.insights.iter().skip(start).cloned().collect()
    }
}

fn extract_topics(conversation: &[TranscriptMessage]) -> Vec<String> {
    let content = conversation
        .iter()
        .map(|m| m.content.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut topics: Vec<String> = TOPIC_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| content.contains(k)))
        .map(|(topic, _)| topic.to_string())
        .collect();

    if topics.is_empty() {
        topics.push("allgemein".to_string());
    }
    topics
}
