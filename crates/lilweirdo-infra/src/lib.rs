//! Infrastructure implementations for Lil Weirdo.
//!
//! - `llm::ollama`: the Ollama completion backend
//! - `config`: loading `lilweirdo.toml` and environment overrides

pub mod config;
pub mod llm;
