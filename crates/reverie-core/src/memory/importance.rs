//! Importance scoring for the promotion gate.
//!
//! Additive weighted evidence over a fixed vocabulary, clamped to `[0, 1]`.
//! A message matching many keywords saturates at 1.0; the score is never
//! normalized. The weights are tuning constants, not derived values.

use reverie_types::message::Role;

/// Salience terms: explicit remember-cues, dates, relationship, emotion and
/// work vocabulary (German with a few English loans, matching the corpus
/// this gate was tuned on).
const SALIENCE_KEYWORDS: &[&str] = &[
    "wichtig",
    "erinnere",
    "merke",
    "vergiss nicht",
    "geburtstag",
    "birthday",
    "hochzeitstag",
    "anniversary",
    "liebe",
    "freund",
    "familie",
    "kind",
    "sohn",
    "tochter",
    "arbeit",
    "job",
    "projekt",
    "ziel",
    "traum",
    "problem",
    "schwierig",
    "hilfe",
    "brauche",
];

/// Personal-name tokens and close-relation address terms.
const PERSONAL_NAMES: &[&str] = &["lena", "jonas", "mama", "papa", "frau", "mann"];

/// Self-referential acknowledgement phrases in assistant replies.
const ACKNOWLEDGEMENT_PHRASES: &[&str] = &["du hast", "ich merke", "wichtig"];

const KEYWORD_WEIGHT: f32 = 0.3;
const NAME_WEIGHT: f32 = 0.2;
const LENGTH_WEIGHT: f32 = 0.1;
const ACKNOWLEDGEMENT_WEIGHT: f32 = 0.2;

/// Deterministic, pure importance scorer.
///
/// Intentionally simple and replaceable; the contract that matters is:
/// pure function, output bounded to `[0, 1]`, monotone in evidence count.
#[derive(Debug, Clone, Default)]
pub struct ImportanceEvaluator;

impl ImportanceEvaluator {
    /// Score a message's importance in `[0, 1]`.
    pub fn score(&self, content: &str, role: Role) -> f32 {
        let lower = content.to_lowercase();
        let mut score = 0.0_f32;

        for keyword in SALIENCE_KEYWORDS {
            if lower.contains(keyword) {
                score += KEYWORD_WEIGHT;
            }
        }

        for name in PERSONAL_NAMES {
            if lower.contains(name) {
                score += NAME_WEIGHT;
            }
        }

        // Character count, not bytes: umlaut-heavy text must not cross the
        // length thresholds early.
        let chars = content.chars().count();
        if chars > 100 {
            score += LENGTH_WEIGHT;
        }
        if chars > 200 {
            score += LENGTH_WEIGHT;
        }

        if role == Role::Assistant
            && ACKNOWLEDGEMENT_PHRASES
                .iter()
                .any(|phrase| lower.contains(phrase))
        {
            score += ACKNOWLEDGEMENT_WEIGHT;
        }

        score.min(1.0)
    }
}
