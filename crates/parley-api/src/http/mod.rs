//! HTTP layer for Parley.
//!
//! Axum server exposing the whole-reply and streamed chat endpoints, health
//! checks, and an optional static directory.

pub mod error;
pub mod handlers;
pub mod router;
