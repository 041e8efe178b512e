//! OllamaBackend -- concrete [`CompletionBackend`] implementation for Ollama.
//!
//! Each derived model is registered with `/api/create` from a base model,
//! a prompt template, and stop sequences; completions are non-streaming
//! `/api/generate` calls.

use std::time::Duration;

use reqwest::Response;

use lilweirdo_core::llm::backend::CompletionBackend;
use lilweirdo_types::llm::{BackendError, ModelConfig};

use super::types::{CreateRequest, DeleteRequest, GenerateRequest, GenerateResponse};

/// Ollama completion backend.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaBackend {
    /// Create a backend talking to `base_url` (e.g. `http://localhost:11434`).
    ///
    /// `timeout` bounds each whole request; generation on a cold model can
    /// take minutes.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn request_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Unreachable(format!("HTTP request failed: {e}"))
    }
}

/// Turn a non-2xx response into [`BackendError::Status`].
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

impl CompletionBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn create_model(&self, name: &str, config: &ModelConfig) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url("/api/create"))
            .json(&CreateRequest::new(name, config))
            .send()
            .await
            .map_err(request_error)?;
        check_status(response).await?;
        Ok(())
    }

    async fn generate(&self, name: &str, prompt: &str) -> Result<String, BackendError> {
        let body = GenerateRequest {
            model: name,
            prompt,
            stream: false,
        };
        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let parsed: GenerateResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout
                } else {
                    BackendError::Deserialization(format!("failed to parse response: {e}"))
                }
            })?;

        tracing::debug!(
            model = %name,
            eval_count = ?parsed.eval_count,
            total_duration_ns = ?parsed.total_duration,
            "Ollama generation finished"
        );
        Ok(parsed.response)
    }

    async fn delete_model(&self, name: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.url("/api/delete"))
            .json(&DeleteRequest { model: name })
            .send()
            .await
            .map_err(request_error)?;
        check_status(response).await?;
        Ok(())
    }
}
