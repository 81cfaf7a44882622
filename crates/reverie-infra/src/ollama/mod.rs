//! Ollama client: chat generation over NDJSON streaming and embeddings.

pub mod client;

pub use client::OllamaClient;
