//! The conversational response pipeline.
//!
//! user text -> [`memory`] -> [`orchestrator`] -> [`upstream`] (or
//! [`fallback`]) -> reply -> [`memory`] -> [`chunker`] -> fragments.

pub mod chunker;
pub mod fallback;
pub mod memory;
pub mod orchestrator;
pub mod prompt;
pub mod upstream;
