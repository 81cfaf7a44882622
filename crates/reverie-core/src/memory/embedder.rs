//! Embedder trait for text-to-vector conversion.
//!
//! Implementations (e.g., the Ollama embeddings endpoint) live in
//! reverie-infra.

use reverie_types::error::EmbeddingError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// No retries are attempted by callers; a failure degrades the operation.
pub trait Embedder: Send + Sync {
    /// Embed a single text into a fixed-length vector.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
