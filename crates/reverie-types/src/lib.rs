//! Shared domain types for Reverie.
//!
//! This crate holds the data shapes exchanged between the core pipeline and
//! its collaborators: transcript messages, memory records, cognitive state,
//! streaming turn events, generation request/chunk types, the error taxonomy,
//! and configuration. It depends only on serde/chrono/thiserror and never
//! on any IO crate.

pub mod cognition;
pub mod config;
pub mod error;
pub mod event;
pub mod llm;
pub mod memory;
pub mod message;
