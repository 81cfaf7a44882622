//! Post-turn side-effect collaborators: background thoughts, topic
//! learning, and self-reflection.
//!
//! These are invoked by the orchestrator as opaque side-effecting calls;
//! none of them participate in the pipeline's ordering or failure
//! contracts.

pub mod learning;
pub mod reflection;
pub mod subconscious;
