//! ChatModel trait definition.
//!
//! The generation collaborator. `stream` returns a boxed stream so trait
//! objects stay possible at this seam; a chunk may carry a content delta
//! and/or a reasoning delta, and failures surface as a single terminal
//! error item.

use std::pin::Pin;

use futures_util::Stream;

use reverie_types::error::GenerationError;
use reverie_types::llm::{GenerationChunk, GenerationRequest};

/// Trait for generation backends (Ollama, OpenAI-compatible servers, ...).
///
/// Implementations live in reverie-infra.
pub trait ChatModel: Send + Sync {
    /// Human-readable provider name (e.g., "ollama").
    fn name(&self) -> &str;

    /// Send a streaming generation request.
    ///
    /// The stream is finite: it ends after a chunk with `done = true`, after
    /// the underlying connection closes, or after a single `Err` item.
    fn stream(
        &self,
        request: GenerationRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<GenerationChunk, GenerationError>> + Send + 'static>>;
}
