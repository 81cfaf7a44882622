//! Core pipeline and collaborator trait definitions for Reverie.
//!
//! This crate defines the "ports" (embedder, vector index, transcript store,
//! chat model) that the infrastructure layer implements, and the pipeline
//! built on top of them: the tiered session memory subsystem, the cognitive
//! state tracker, the streaming bridge, the per-turn orchestrator, and the
//! session registry. It depends only on `reverie-types` -- never on
//! `reverie-infra` or any IO crate.

pub mod cognition;
pub mod llm;
pub mod memory;
pub mod reflect;
pub mod service;
pub mod session;
pub mod turn;
