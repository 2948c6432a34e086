//! Observability for Parley: subscriber setup and the GenAI attribute names
//! used on upstream completion spans.

pub mod genai_attrs;
pub mod tracing_setup;
