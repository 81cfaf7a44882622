//! High-level service facade over the session registry, the turn
//! orchestrator, and long-term memory.

pub mod companion;

pub use companion::CompanionService;
