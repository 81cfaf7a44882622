//! Ollama HTTP client.
//!
//! Implements both model-facing ports against a local Ollama daemon:
//! `ChatModel` via `POST /api/chat` (newline-delimited JSON, one object per
//! chunk) and `Embedder` via `POST /api/embeddings`.
//!
//! Chunk boundaries in the byte stream do not line up with NDJSON line
//! boundaries, so the adapter buffers bytes and only parses complete lines;
//! a trailing unterminated line is parsed when the stream ends.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use serde::Deserialize;

use reverie_core::llm::provider::ChatModel;
use reverie_core::memory::embedder::Embedder;
use reverie_types::error::{EmbeddingError, GenerationError};
use reverie_types::llm::{GenerationChunk, GenerationRequest};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Client for a local Ollama daemon.
pub struct OllamaClient {
    base_url: String,
    http: reqwest::Client,
    model: String,
    embedding_model: String,
    embedding_dimension: usize,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        embedding_model: impl Into<String>,
        embedding_dimension: usize,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            model: model.into(),
            embedding_model: embedding_model.into(),
            embedding_dimension,
        }
    }

    /// Client against the default local daemon, using one model for both
    /// chat and embeddings (llama3 embeds at 4096 dimensions).
    pub fn local(model: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(DEFAULT_BASE_URL, model.clone(), model, 4096)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatStreamLine {
    #[serde(default)]
    message: Option<ChatDelta>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    thinking: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Accumulates raw bytes and hands out complete newline-terminated lines.
///
/// Decoding happens per complete line, never per network chunk: a multi-byte
/// UTF-8 character split across two chunks is reassembled before it is ever
/// interpreted as text.
#[derive(Default)]
struct LineBuffer {
    bytes: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, piece: &[u8]) {
        self.bytes.extend_from_slice(piece);
    }

    /// The next complete line, trimmed; `None` until a newline arrives.
    fn next_line(&mut self) -> Option<String> {
        let newline = self.bytes.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.bytes.drain(..=newline).collect();
        Some(String::from_utf8_lossy(&line[..newline]).trim().to_string())
    }

    /// Whatever is left after the stream ends, trimmed.
    fn tail(&self) -> String {
        String::from_utf8_lossy(&self.bytes).trim().to_string()
    }
}

/// Parse one NDJSON line into a chunk.
fn parse_chat_line(line: &str) -> Result<GenerationChunk, GenerationError> {
    let parsed: ChatStreamLine =
        serde_json::from_str(line).map_err(|e| GenerationError::Decode(e.to_string()))?;

    if let Some(message) = parsed.error {
        return Err(GenerationError::Provider { message });
    }

    Ok(GenerationChunk {
        content: parsed.message.as_ref().and_then(|m| m.content.clone()),
        reasoning: parsed.message.and_then(|m| m.thinking),
        done: parsed.done,
    })
}

// ---------------------------------------------------------------------------
// ChatModel impl
// ---------------------------------------------------------------------------

impl ChatModel for OllamaClient {
    fn name(&self) -> &str {
        &self.model
    }

    fn stream(
        &self,
        request: GenerationRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<GenerationChunk, GenerationError>> + Send + 'static>>
    {
        let url = format!("{}/api/chat", self.base_url);
        let http = self.http.clone();

        Box::pin(async_stream::try_stream! {
            let response = http
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| GenerationError::Provider {
                    message: e.to_string(),
                })?;
            let response = response.error_for_status().map_err(|e| {
                GenerationError::Provider {
                    message: e.to_string(),
                }
            })?;

            let mut bytes = response.bytes_stream();
            let mut buffer = LineBuffer::default();
            let mut finished = false;

            'outer: while let Some(piece) = bytes.next().await {
                let piece = piece.map_err(|e| GenerationError::Stream(e.to_string()))?;
                buffer.push(&piece);

                while let Some(line) = buffer.next_line() {
                    if line.is_empty() {
                        continue;
                    }
                    let chunk = parse_chat_line(&line)?;
                    let done = chunk.done;
                    yield chunk;
                    if done {
                        finished = true;
                        break 'outer;
                    }
                }
            }

            // An unterminated final line still counts.
            let tail = buffer.tail();
            if !finished && !tail.is_empty() {
                yield parse_chat_line(&tail)?;
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Embedder impl
// ---------------------------------------------------------------------------

impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/api/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.embedding_model,
            "prompt": text,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        if parsed.embedding.len() != self.embedding_dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.embedding_dimension,
                actual: parsed.embedding.len(),
            });
        }
        Ok(parsed.embedding)
    }

    fn dimension(&self) -> usize {
        self.embedding_dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_line() {
        let chunk = parse_chat_line(
            r#"{"model":"llama3","message":{"role":"assistant","content":"Hallo"},"done":false}"#,
        )
        .unwrap();
        assert_eq!(chunk.content.as_deref(), Some("Hallo"));
        assert!(!chunk.done);
    }

    #[test]
    fn test_parse_terminal_line() {
        let chunk = parse_chat_line(
            r#"{"model":"llama3","message":{"role":"assistant","content":""},"done":true}"#,
        )
        .unwrap();
        assert!(chunk.done);
    }

    #[test]
    fn test_parse_thinking_delta() {
        let chunk = parse_chat_line(
            r#"{"message":{"role":"assistant","content":"","thinking":"hmm"},"done":false}"#,
        )
        .unwrap();
        assert_eq!(chunk.reasoning.as_deref(), Some("hmm"));
    }

    #[test]
    fn test_parse_error_line() {
        let err = parse_chat_line(r#"{"error":"model 'nope' not found"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::Provider { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_parse_garbage_is_decode_error() {
        let err = parse_chat_line("not json at all").unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[test]
    fn test_split_utf8_character_across_chunks() {
        let line =
            "{\"message\":{\"role\":\"assistant\",\"content\":\"Glück\"},\"done\":false}\n"
                .as_bytes();
        // Split between the two bytes of the "ü".
        let split = line.iter().position(|&b| b == 0xC3).unwrap() + 1;

        let mut buffer = LineBuffer::default();
        buffer.push(&line[..split]);
        assert!(buffer.next_line().is_none());
        buffer.push(&line[split..]);

        let chunk = parse_chat_line(&buffer.next_line().unwrap()).unwrap();
        assert_eq!(chunk.content.as_deref(), Some("Glück"));
    }

    #[test]
    fn test_line_buffer_yields_lines_and_tail() {
        let mut buffer = LineBuffer::default();
        buffer.push(b"{\"done\":false}\n{\"done\":");
        assert_eq!(buffer.next_line().as_deref(), Some("{\"done\":false}"));
        assert!(buffer.next_line().is_none());
        buffer.push(b"true}");
        assert_eq!(buffer.tail(), "{\"done\":true}");
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = OllamaClient::new("http://localhost:11434/", "llama3", "llama3", 4096);
        assert_eq!(client.base_url, "http://localhost:11434");
    }
}
