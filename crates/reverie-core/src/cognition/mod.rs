//! Derived cognitive state: the emotion vector, the inner-thought
//! generator, and the persona preamble.

pub mod persona;
pub mod tracker;

pub use tracker::CognitiveTracker;
