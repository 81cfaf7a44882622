//! Durable log store trait for per-session transcripts.
//!
//! Implementations (e.g., `SqliteTranscriptStore`) live in reverie-infra.

use reverie_types::error::PersistenceError;
use reverie_types::message::TranscriptMessage;

/// Trait for the durable, per-session ordered message log.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait TranscriptStore: Send + Sync {
    /// Append one message to a session's log.
    fn append(
        &self,
        session_id: &str,
        message: &TranscriptMessage,
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;

    /// Load a session's full log, ordered by sequence.
    fn load(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<TranscriptMessage>, PersistenceError>> + Send;

    /// Remove a session's log entirely. Idempotent.
    fn clear(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;
}
