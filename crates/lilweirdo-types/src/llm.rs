//! Completion backend types for Lil Weirdo.
//!
//! The backend is treated as an opaque text-completion service that can
//! register short-lived derived models. These types describe that derived
//! model and the ways talking to the backend can fail.

use serde::{Deserialize, Serialize};

/// Configuration of a derived backend model.
///
/// Registered under a unique name for the duration of a single completion
/// request and deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base model name (e.g., "mistral").
    pub base_model: String,
    /// Base model tag (e.g., "latest").
    pub tag: String,
    /// Prompt template with a single `{{ .Prompt }}` insertion point.
    pub template: String,
    /// Strings that end generation.
    pub stop_sequences: Vec<String>,
}

impl ModelConfig {
    /// The base model reference the derived model is built `FROM`.
    pub fn from_ref(&self) -> String {
        format!("{}:{}", self.base_model, self.tag)
    }
}

/// Errors from completion backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("backend request timed out")]
    Timeout,
}
