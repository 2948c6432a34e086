//! Infrastructure implementations for Parley.
//!
//! - [`llm`]: concrete upstream providers behind the `LlmProvider` trait
//! - [`config`]: upstream configuration and adapter construction

pub mod config;
pub mod llm;
