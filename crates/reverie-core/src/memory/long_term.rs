//! Long-term, similarity-searchable memory with score-gated promotion.
//!
//! The tiering boundary of the system: short-term is ephemeral and complete,
//! long-term is sparse and selectively populated -- a write-back cache with
//! a score-gated admission policy instead of LRU. Generic over the embedder
//! and vector index collaborators so the core never touches IO directly.

use reverie_types::error::EmbeddingError;
use reverie_types::memory::{MemoryMetadata, MemoryRecord, RecalledMemory};
use reverie_types::message::TranscriptMessage;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::memory::embedder::Embedder;
use crate::memory::importance::ImportanceEvaluator;
use crate::memory::vector::VectorIndex;

/// Embedding-indexed long-term memory store.
pub struct LongTermMemory<E: Embedder, V: VectorIndex> {
    embedder: E,
    index: V,
    evaluator: ImportanceEvaluator,
}

impl<E: Embedder, V: VectorIndex> LongTermMemory<E, V> {
    pub fn new(embedder: E, index: V) -> Self {
        Self {
            embedder,
            index,
            evaluator: ImportanceEvaluator,
        }
    }

    /// Store a memory and return the minted record.
    ///
    /// On embedding failure nothing is stored and the error is returned;
    /// callers degrade without retrying. An index write failure is logged
    /// and swallowed, matching the persistence policy.
    pub async fn add(
        &self,
        content: &str,
        metadata: MemoryMetadata,
    ) -> Result<MemoryRecord, EmbeddingError> {
        let embedding = self.embedder.embed(content).await?;
        let record = MemoryRecord {
            id: Uuid::now_v7().to_string(),
            content: content.to_string(),
            metadata,
        };

        if let Err(err) = self
            .index
            .upsert(&record.id, &embedding, &record.metadata, &record.content)
            .await
        {
            warn!(memory_id = %record.id, error = %err, "memory not indexed");
        }
        Ok(record)
    }

    /// Similarity search, nearest-first, at most `k` results.
    ///
    /// Never fails: an unreachable embedder or index collapses to an empty
    /// result with the cause logged.
    pub async fn search(&self, query: &str, k: usize, min_importance: f32) -> Vec<RecalledMemory> {
        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(err) => {
                debug!(error = %err, "memory search degraded to empty: embedding failed");
                return Vec::new();
            }
        };

        let filter = (min_importance > 0.0).then_some(min_importance);
        match self.index.query(&embedding, k, filter).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!(error = %err, "memory search degraded to empty: index failed");
                Vec::new()
            }
        }
    }

    /// Promote every candidate whose importance clears the threshold.
    ///
    /// Returns the number of messages actually stored.
    pub async fn promote_if_important(
        &self,
        messages: &[TranscriptMessage],
        threshold: f32,
    ) -> usize {
        let mut promoted = 0;
        for message in messages {
            let score = self.evaluator.score(&message.content, message.role);
            if score < threshold {
                continue;
            }
            let metadata = MemoryMetadata::auto_detected(score, message.role);
            match self.add(&message.content, metadata).await {
                Ok(record) => {
                    debug!(
                        sequence = message.sequence,
                        memory_id = %record.id,
                        score,
                        "message promoted to long-term memory"
                    );
                    promoted += 1;
                }
                Err(err) => {
                    debug!(sequence = message.sequence, error = %err, "promotion skipped: embedding failed");
                }
            }
        }
        promoted
    }

    /// The importance scorer backing the promotion gate.
    pub fn evaluator(&self) -> &ImportanceEvaluator {
        &self.evaluator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_types::error::IndexError;
    use reverie_types::memory::MemorySource;
    use reverie_types::message::Role;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeEmbedder {
        failing: AtomicBool,
    }

    impl FakeEmbedder {
        fn new() -> Self {
            Self {
                failing: AtomicBool::new(false),
            }
        }
    }

    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(EmbeddingError::Request("unreachable".to_string()));
            }
            // Deterministic toy embedding: char-sum and length.
            let sum: f32 = text.chars().map(|c| c as u32 as f32).sum();
            Ok(vec![sum, text.len() as f32, 1.0])
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    #[derive(Default)]
    struct FakeIndex {
        records: Mutex<Vec<(String, MemoryMetadata, String)>>,
    }

    impl VectorIndex for FakeIndex {
        async fn upsert(
            &self,
            id: &str,
            _vector: &[f32],
            metadata: &MemoryMetadata,
            document: &str,
        ) -> Result<(), IndexError> {
            self.records.lock().unwrap().push((
                id.to_string(),
                metadata.clone(),
                document.to_string(),
            ));
            Ok(())
        }

        async fn query(
            &self,
            _vector: &[f32],
            k: usize,
            min_importance: Option<f32>,
        ) -> Result<Vec<RecalledMemory>, IndexError> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .filter(|(_, meta, _)| {
                    min_importance.is_none_or(|min| meta.importance >= min)
                })
                .take(k)
                .map(|(_, meta, doc)| RecalledMemory {
                    content: doc.clone(),
                    metadata: meta.clone(),
                    distance: 0.0,
                })
                .collect())
        }
    }

    fn message(role: Role, content: &str, sequence: u64) -> TranscriptMessage {
        TranscriptMessage {
            role,
            content: content.to_string(),
            sequence,
        }
    }

    #[tokio::test]
    async fn test_search_on_embedding_failure_returns_empty() {
        let memory = LongTermMemory::new(FakeEmbedder::new(), FakeIndex::default());
        memory.embedder.failing.store(true, Ordering::SeqCst);
        let hits = memory.search("irgendwas", 5, 0.0).await;
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_add_on_embedding_failure_stores_nothing() {
        let memory = LongTermMemory::new(FakeEmbedder::new(), FakeIndex::default());
        memory.embedder.failing.store(true, Ordering::SeqCst);
        let result = memory
            .add("verloren", MemoryMetadata::user_generated())
            .await;
        assert!(result.is_err());
        assert!(memory.index.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_promotion_gated_by_threshold() {
        let memory = LongTermMemory::new(FakeEmbedder::new(), FakeIndex::default());
        let messages = vec![
            // "geburtstag" + "familie" -> 0.6, clears 0.4
            message(Role::User, "Der Geburtstag meiner Familie", 0),
            // no evidence -> 0.0, below 0.4
            message(Role::User, "Hallo", 1),
        ];
        let promoted = memory.promote_if_important(&messages, 0.4).await;
        assert_eq!(promoted, 1);

        let records = memory.index.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        let (_, metadata, document) = &records[0];
        assert_eq!(document, "Der Geburtstag meiner Familie");
        assert_eq!(metadata.source, MemorySource::AutoDetected);
        assert_eq!(metadata.role, Some(Role::User));
        assert!(metadata.importance >= 0.4);
    }

    #[tokio::test]
    async fn test_promotion_boundary_is_inclusive() {
        let memory = LongTermMemory::new(FakeEmbedder::new(), FakeIndex::default());
        // Exactly one keyword -> score 0.3.
        let messages = vec![message(Role::User, "Das ist ein Problem", 0)];
        assert_eq!(memory.promote_if_important(&messages, 0.3).await, 1);
        assert_eq!(memory.promote_if_important(&messages, 0.31).await, 0);
    }

    #[tokio::test]
    async fn test_search_honors_min_importance() {
        let memory = LongTermMemory::new(FakeEmbedder::new(), FakeIndex::default());
        memory
            .add("belanglos", MemoryMetadata::auto_detected(0.2, Role::User))
            .await
            .unwrap();
        memory
            .add(
                "bedeutsam",
                MemoryMetadata::auto_detected(0.9, Role::User),
            )
            .await
            .unwrap();

        let hits = memory.search("irgendwas", 10, 0.5).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "bedeutsam");
    }

    #[tokio::test]
    async fn test_add_returns_the_stored_record() {
        let memory = LongTermMemory::new(FakeEmbedder::new(), FakeIndex::default());
        let record = memory
            .add("Lena mag Kunst", MemoryMetadata::user_generated())
            .await
            .unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.content, "Lena mag Kunst");

        let records = memory.index.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, record.id);
    }
}
