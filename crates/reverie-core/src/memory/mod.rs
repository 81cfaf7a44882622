//! The tiered session memory subsystem.
//!
//! Short-term is the ephemeral, complete per-session log; long-term is the
//! sparse, similarity-indexed store populated through a score-gated
//! admission policy. The collaborator traits (embedder, vector index,
//! transcript store) are defined here and implemented in `reverie-infra`.

pub mod embedder;
pub mod importance;
pub mod long_term;
pub mod short_term;
pub mod transcript;
pub mod vector;
