//! Ollama completion backend.
//!
//! This module provides the [`OllamaBackend`] which implements the
//! [`CompletionBackend`](lilweirdo_core::llm::backend::CompletionBackend)
//! trait over Ollama's native HTTP API (`/api/create`, `/api/generate`,
//! `/api/delete`).

pub mod client;
pub mod types;

pub use client::OllamaBackend;
