//! Per-session ordered short-term buffer.
//!
//! The buffer is the authoritative conversation log for the lifetime of the
//! process. Every append is pushed through the durable [`TranscriptStore`]
//! before returning; a persistence failure is logged and swallowed rather
//! than failing the turn, an accepted risk surfaced to the operator via the
//! warning log.

use std::sync::Arc;

use reverie_types::message::{Role, TranscriptMessage};
use tracing::warn;

use crate::memory::transcript::TranscriptStore;

/// Ordered, durable per-session message log.
pub struct ShortTermBuffer<S: TranscriptStore> {
    session_id: String,
    store: Arc<S>,
    messages: Vec<TranscriptMessage>,
    next_sequence: u64,
}

impl<S: TranscriptStore> ShortTermBuffer<S> {
    /// Open the buffer for a session, restoring any persisted log.
    ///
    /// A load failure starts the session empty (and logged); it does not
    /// prevent the session from opening.
    pub async fn open(session_id: impl Into<String>, store: Arc<S>) -> Self {
        let session_id = session_id.into();
        let messages = match store.load(&session_id).await {
            Ok(messages) => messages,
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "transcript restore failed, starting empty");
                Vec::new()
            }
        };
        let next_sequence = messages.last().map(|m| m.sequence + 1).unwrap_or(0);
        Self {
            session_id,
            store,
            messages,
            next_sequence,
        }
    }

    /// Append a message, assigning the next sequence number.
    ///
    /// The durable write happens before this returns; on write failure the
    /// in-memory log still records the message and remains authoritative.
    pub async fn append(&mut self, role: Role, content: impl Into<String>) -> u64 {
        let message = TranscriptMessage {
            role,
            content: content.into(),
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;

        if let Err(err) = self.store.append(&self.session_id, &message).await {
            warn!(
                session_id = %self.session_id,
                sequence = message.sequence,
                error = %err,
                "transcript append not persisted; in-memory log stays authoritative"
            );
        }

        let sequence = message.sequence;
        self.messages.push(message);
        sequence
    }

    /// The last `limit` messages, most-recent-last.
    pub fn recent(&self, limit: usize) -> &[TranscriptMessage] {
        let start = self.messages.len().saturating_sub(limit);
        &self.messages[start..]
    }

    /// The full ordered log.
    pub fn all(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    /// Reset to empty and persist the empty state. Idempotent.
    pub async fn clear(&mut self) {
        self.messages.clear();
        self.next_sequence = 0;
        if let Err(err) = self.store.clear(&self.session_id).await {
            warn!(session_id = %self.session_id, error = %err, "transcript clear not persisted");
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
