//! Observability for Parley: tracing subscriber setup and the shared
//! operation names that appear as span fields.

pub mod fields;
pub mod tracing_setup;
