//! Observability for Reverie: tracing subscriber initialization.

pub mod tracing_setup;
