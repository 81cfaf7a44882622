//! Vector index trait for similarity-searchable memory storage.
//!
//! Implementations live in reverie-infra. The backing index is shared
//! across all sessions without partitioning; implementations must be safe
//! under concurrent `upsert`/`query`.

use reverie_types::error::IndexError;
use reverie_types::memory::{MemoryMetadata, RecalledMemory};

/// Trait for the embedding-indexed memory store.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait VectorIndex: Send + Sync {
    /// Insert or replace a record by id.
    ///
    /// All vectors in one index must share the same dimensionality.
    fn upsert(
        &self,
        id: &str,
        vector: &[f32],
        metadata: &MemoryMetadata,
        document: &str,
    ) -> impl std::future::Future<Output = Result<(), IndexError>> + Send;

    /// K-nearest-neighbor query, nearest-first, at most `k` results.
    ///
    /// When `min_importance` is set, only records whose importance is at
    /// least that value are considered.
    fn query(
        &self,
        vector: &[f32],
        k: usize,
        min_importance: Option<f32>,
    ) -> impl std::future::Future<Output = Result<Vec<RecalledMemory>, IndexError>> + Send;
}
