//! The streaming turn pipeline: producer/consumer bridge and the per-turn
//! orchestrator state machine.

pub mod bridge;
pub mod orchestrator;
