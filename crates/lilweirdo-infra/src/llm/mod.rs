//! Completion backend implementations.

pub mod ollama;
