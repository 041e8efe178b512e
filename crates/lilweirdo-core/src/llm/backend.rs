//! CompletionBackend trait definition.
//!
//! The backend is an opaque text-completion service that can register a
//! derived model under a name, complete a prompt against it, and delete it.

use std::future::Future;

use lilweirdo_types::llm::{BackendError, ModelConfig};

/// Trait for completion backends (Ollama, test doubles).
///
/// Implementations live in lilweirdo-infra (e.g., `OllamaBackend`).
pub trait CompletionBackend: Send + Sync {
    /// Human-readable backend name (e.g., "ollama").
    fn name(&self) -> &str;

    /// Register a derived model under `name`.
    fn create_model(
        &self,
        name: &str,
        config: &ModelConfig,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Complete `prompt` with the model registered as `name`.
    fn generate(
        &self,
        name: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Delete the derived model registered as `name`.
    fn delete_model(&self, name: &str) -> impl Future<Output = Result<(), BackendError>> + Send;
}
