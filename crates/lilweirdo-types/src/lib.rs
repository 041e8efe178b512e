//! Shared domain types for Lil Weirdo.
//!
//! Chat entities as the core sees them, backend model configuration, bot
//! configuration, and the error taxonomy shared by every other crate.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
