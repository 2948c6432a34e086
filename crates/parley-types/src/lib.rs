//! Shared domain types for Parley.
//!
//! This crate contains the types passed between the conversation pipeline,
//! the upstream provider adapter and the HTTP transport: messages, completion
//! requests, stream fragments and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod error;
pub mod llm;
