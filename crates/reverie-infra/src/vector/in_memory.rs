//! In-process cosine-similarity vector index.
//!
//! Brute-force scan over all stored vectors. Fine for the per-user memory
//! volumes this store sees (hundreds to low thousands of records); an ANN
//! index would be the swap-in replacement behind the same trait if that
//! ever changes.

use std::collections::HashMap;

use tokio::sync::RwLock;

use reverie_core::memory::vector::VectorIndex;
use reverie_types::error::IndexError;
use reverie_types::memory::{MemoryMetadata, RecalledMemory};

struct StoredEntry {
    vector: Vec<f32>,
    metadata: MemoryMetadata,
    document: String,
}

/// Brute-force cosine index over a fixed embedding dimension.
pub struct InMemoryVectorIndex {
    dimension: usize,
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl InMemoryVectorIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::Dimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(
        &self,
        id: &str,
        vector: &[f32],
        metadata: &MemoryMetadata,
        document: &str,
    ) -> Result<(), IndexError> {
        self.check_dimension(vector)?;
        self.entries.write().await.insert(
            id.to_string(),
            StoredEntry {
                vector: vector.to_vec(),
                metadata: metadata.clone(),
                document: document.to_string(),
            },
        );
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        min_importance: Option<f32>,
    ) -> Result<Vec<RecalledMemory>, IndexError> {
        self.check_dimension(vector)?;

        let entries = self.entries.read().await;
        let mut hits: Vec<RecalledMemory> = entries
            .values()
            .filter(|entry| {
                min_importance.is_none_or(|min| entry.metadata.importance >= min)
            })
            .map(|entry| RecalledMemory {
                content: entry.document.clone(),
                metadata: entry.metadata.clone(),
                distance: 1.0 - cosine_similarity(vector, &entry.vector),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        Ok(hits)
    }
}

fn cosine_similarity(query: &[f32], candidate: &[f32]) -> f32 {
    let mut dot = 0.0_f32;
    let mut q_norm = 0.0_f32;
    let mut c_norm = 0.0_f32;
    for (q, c) in query.iter().zip(candidate) {
        dot += q * c;
        q_norm += q * q;
        c_norm += c * c;
    }
    dot / (q_norm.sqrt() * c_norm.sqrt()).max(f32::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(importance: f32) -> MemoryMetadata {
        MemoryMetadata {
            importance,
            ..MemoryMetadata::user_generated()
        }
    }

    #[tokio::test]
    async fn test_nearest_first_ordering() {
        let index = InMemoryVectorIndex::new(2);
        index
            .upsert("far", &[0.0, 1.0], &metadata(1.0), "orthogonal")
            .await
            .unwrap();
        index
            .upsert("near", &[1.0, 0.1], &metadata(1.0), "almost parallel")
            .await
            .unwrap();

        let hits = index.query(&[1.0, 0.0], 10, None).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].content, "almost parallel");
        assert!(hits[0].distance < hits[1].distance);
    }

    #[tokio::test]
    async fn test_k_truncation() {
        let index = InMemoryVectorIndex::new(2);
        for i in 0..5 {
            index
                .upsert(
                    &format!("m{i}"),
                    &[1.0, i as f32],
                    &metadata(1.0),
                    &format!("doc {i}"),
                )
                .await
                .unwrap();
        }
        let hits = index.query(&[1.0, 0.0], 3, None).await.unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn test_importance_filter() {
        let index = InMemoryVectorIndex::new(2);
        index
            .upsert("weak", &[1.0, 0.0], &metadata(0.2), "trivia")
            .await
            .unwrap();
        index
            .upsert("strong", &[1.0, 0.0], &metadata(0.9), "essential")
            .await
            .unwrap();

        let hits = index.query(&[1.0, 0.0], 10, Some(0.5)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "essential");
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let index = InMemoryVectorIndex::new(2);
        index
            .upsert("a", &[1.0, 0.0], &metadata(1.0), "first")
            .await
            .unwrap();
        index
            .upsert("a", &[1.0, 0.0], &metadata(1.0), "second")
            .await
            .unwrap();

        assert_eq!(index.len().await, 1);
        let hits = index.query(&[1.0, 0.0], 10, None).await.unwrap();
        assert_eq!(hits[0].content, "second");
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let index = InMemoryVectorIndex::new(3);
        let err = index
            .upsert("a", &[1.0, 0.0], &metadata(1.0), "short")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::Dimension {
                expected: 3,
                actual: 2
            }
        ));

        let err = index.query(&[1.0], 5, None).await.unwrap_err();
        assert!(matches!(err, IndexError::Dimension { .. }));
    }

    #[tokio::test]
    async fn test_zero_vector_does_not_panic() {
        let index = InMemoryVectorIndex::new(2);
        index
            .upsert("z", &[0.0, 0.0], &metadata(1.0), "null")
            .await
            .unwrap();
        let hits = index.query(&[1.0, 0.0], 1, None).await.unwrap();
        assert!(hits[0].distance.is_finite());
    }
}
