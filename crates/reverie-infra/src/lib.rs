//! Infrastructure layer for Reverie.
//!
//! Contains implementations of the collaborator traits defined in
//! `reverie-core`: SQLite transcript storage, the Ollama chat and embedding
//! client, and the in-memory cosine vector index.

pub mod config;
pub mod ollama;
pub mod sqlite;
pub mod vector;
