//! Business logic for Parley.
//!
//! This crate owns the conversational response pipeline: the bounded
//! conversation memory, the upstream client adapter, the fallback responder,
//! the response orchestrator and the stream chunker. It depends on
//! `parley-types` and the span attribute names in `parley-observe` -- never on
//! `parley-infra` or any network crate. Concrete
//! providers plug in through the [`llm::provider::LlmProvider`] trait.

pub mod chat;
pub mod llm;
