//! Prompt templates and the ephemeral backend model lifecycle.
//!
//! A [`Templater`] owns a prompt template and the settings of the derived
//! model it runs on. Every generation registers a uniquely named derived
//! model, completes against it, and deletes it again, so backend-side model
//! count stays bounded by the number of requests in flight.

use std::future::Future;
use std::sync::Arc;

use tracing::{Instrument, debug, info_span, trace, warn};
use uuid::Uuid;

use lilweirdo_types::config::DEFAULT_MODEL;
use lilweirdo_types::llm::{BackendError, ModelConfig};

use super::box_backend::BoxCompletionBackend;

/// Where the prompt goes inside a template.
pub const PROMPT_SLOT: &str = "{{ .Prompt }}";

/// Marks the start of one remembered message in a prompt.
pub const MESSAGE_START: &str = "[MSG]";

/// Marks the end of one remembered message in a prompt.
pub const MESSAGE_END: &str = "[/MSG]";

/// Strings that end generation unless a template says otherwise.
pub const DEFAULT_STOP_SEQUENCES: &[&str] = &["[stop]", "[/INST]", "[INST]", MESSAGE_START, MESSAGE_END];

/// A prompt template plus the derived-model settings it runs with.
///
/// Immutable once built; personalities share one through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templater {
    persona: String,
    template: String,
    stop_sequences: Vec<String>,
    base_model: String,
    tag: String,
    start_token: String,
    end_token: String,
    separator: String,
}

impl Templater {
    /// Create a templater for `persona` on the default base model.
    pub fn new(persona: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            template: template.into(),
            stop_sequences: DEFAULT_STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
            base_model: DEFAULT_MODEL.to_string(),
            tag: "latest".to_string(),
            start_token: MESSAGE_START.to_string(),
            end_token: MESSAGE_END.to_string(),
            separator: "\n".to_string(),
        }
    }

    pub fn with_base_model(mut self, base_model: impl Into<String>, tag: impl Into<String>) -> Self {
        self.base_model = base_model.into();
        self.tag = tag.into();
        self
    }

    pub fn with_stop_sequences(mut self, stop_sequences: Vec<String>) -> Self {
        self.stop_sequences = stop_sequences;
        self
    }

    /// Override the message delimiters and the line separator.
    pub fn with_delimiters(
        mut self,
        start_token: impl Into<String>,
        end_token: impl Into<String>,
        separator: impl Into<String>,
    ) -> Self {
        self.start_token = start_token.into();
        self.end_token = end_token.into();
        self.separator = separator.into();
        self
    }

    /// Name the model speaks as in the trailing cue.
    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn start_token(&self) -> &str {
        &self.start_token
    }

    pub fn end_token(&self) -> &str {
        &self.end_token
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The derived model registered for each request.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            base_model: self.base_model.clone(),
            tag: self.tag.clone(),
            template: self.template.clone(),
            stop_sequences: self.stop_sequences.clone(),
        }
    }

    /// Substitute `prompt` into the template's insertion point.
    pub fn render(&self, prompt: &str) -> String {
        self.template.replacen(PROMPT_SLOT, prompt, 1)
    }

    /// Run `run` with the name of a freshly registered derived model.
    ///
    /// The model is deleted before this returns, whether `run` succeeded or
    /// failed. If this future is dropped early the delete is handed to the
    /// runtime instead.
    pub async fn with_model<F, Fut, T>(
        &self,
        backend: &Arc<BoxCompletionBackend>,
        run: F,
    ) -> Result<T, BackendError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let model = EphemeralModel::acquire(backend, &self.model_config()).await?;
        let result = run(model.name().to_string()).await;
        model.release().await;
        result
    }

    /// One completion of `prompt`: no post-processing, no retry.
    pub async fn generate(
        &self,
        backend: &Arc<BoxCompletionBackend>,
        prompt: &str,
    ) -> Result<String, BackendError> {
        let span = info_span!(
            "gen_ai.generate",
            gen_ai.system = backend.name(),
            gen_ai.request.model = %format!("{}:{}", self.base_model, self.tag),
            persona = %self.persona,
            model = tracing::field::Empty,
        );

        async {
            trace!(prompt = %self.render(prompt), "Rendered prompt");
            let text = self
                .with_model(backend, |model| async move {
                    tracing::Span::current().record("model", model.as_str());
                    backend.generate(&model, prompt).await
                })
                .await?;
            debug!(chars = text.len(), "Generation complete");
            Ok::<_, BackendError>(text)
        }
        .instrument(span)
        .await
    }
}

/// A uniquely named derived model that is deleted when released.
///
/// Call [`EphemeralModel::release`] to delete it in-line. Dropping it
/// unreleased schedules the delete on the current tokio runtime.
pub struct EphemeralModel {
    name: String,
    backend: Option<Arc<BoxCompletionBackend>>,
}

impl EphemeralModel {
    /// Register `config` under a new unique name.
    pub async fn acquire(
        backend: &Arc<BoxCompletionBackend>,
        config: &ModelConfig,
    ) -> Result<Self, BackendError> {
        let name = format!("lilweirdo-{}", Uuid::new_v4());
        backend.create_model(&name, config).await?;
        debug!(model = %name, from = %config.from_ref(), "Created ephemeral model");
        Ok(Self {
            name,
            backend: Some(Arc::clone(backend)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delete the model now. A failed delete is logged, not returned.
    pub async fn release(mut self) {
        if let Some(backend) = self.backend.take() {
            match backend.delete_model(&self.name).await {
                Ok(()) => debug!(model = %self.name, "Deleted ephemeral model"),
                Err(e) => warn!(model = %self.name, error = %e, "Failed to delete ephemeral model"),
            }
        }
    }
}

impl Drop for EphemeralModel {
    fn drop(&mut self) {
        let Some(backend) = self.backend.take() else {
            return;
        };
        let name = std::mem::take(&mut self.name);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = backend.delete_model(&name).await {
                        warn!(model = %name, error = %e, "Failed to delete abandoned ephemeral model");
                    }
                });
            }
            Err(_) => warn!(model = %name, "No runtime to delete abandoned ephemeral model"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBackend, MockMode};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn templater() -> Templater {
        Templater::new("Lil Weirdo", "Here's what they said:\n\n{{ .Prompt }}\n")
    }

    #[test]
    fn test_render_substitutes_prompt_once() {
        let t = Templater::new("x", "a {{ .Prompt }} b {{ .Prompt }}");
        assert_eq!(t.render("HELLO"), "a HELLO b {{ .Prompt }}");
    }

    #[test]
    fn test_model_config_carries_raw_template_and_stops() {
        let t = templater().with_base_model("llama3", "8b");
        let config = t.model_config();
        assert_eq!(config.from_ref(), "llama3:8b");
        assert!(config.template.contains(PROMPT_SLOT));
        assert_eq!(config.stop_sequences.len(), DEFAULT_STOP_SEQUENCES.len());
        assert!(config.stop_sequences.contains(&"[/MSG]".to_string()));
    }

    #[tokio::test]
    async fn test_generate_creates_and_deletes_one_model() {
        let (backend, calls) = MockBackend::new(MockMode::Reply("you smell".to_string()));
        let text = templater().generate(&backend, "[MSG] at: hi [/MSG]").await.unwrap();

        assert_eq!(text, "you smell");
        assert_eq!(calls.creates.load(Ordering::SeqCst), 1);
        assert_eq!(calls.generates.load(Ordering::SeqCst), 1);
        assert_eq!(calls.deletes.load(Ordering::SeqCst), 1);
        assert_eq!(calls.created(), calls.deleted());
        assert!(calls.created()[0].starts_with("lilweirdo-"));
        assert_eq!(calls.prompts(), vec!["[MSG] at: hi [/MSG]".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_failure_still_deletes_model() {
        let (backend, calls) = MockBackend::new(MockMode::Fail);
        let t = templater();
        for _ in 0..3 {
            let err = t.generate(&backend, "prompt").await.unwrap_err();
            assert!(matches!(err, BackendError::Unreachable(_)));
        }

        assert_eq!(calls.creates.load(Ordering::SeqCst), 3);
        assert_eq!(calls.deletes.load(Ordering::SeqCst), 3);
        assert_eq!(calls.created(), calls.deleted());
    }

    #[tokio::test]
    async fn test_create_failure_skips_generate_and_delete() {
        let (backend, calls) = MockBackend::new(MockMode::FailCreate);
        let err = templater().generate(&backend, "prompt").await.unwrap_err();

        assert!(matches!(err, BackendError::Status { status: 500, .. }));
        assert_eq!(calls.generates.load(Ordering::SeqCst), 0);
        assert_eq!(calls.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_each_request_gets_a_unique_model() {
        let (backend, calls) = MockBackend::new(MockMode::Reply("ok".to_string()));
        let t = templater();
        let (a, b) = tokio::join!(t.generate(&backend, "one"), t.generate(&backend, "two"));
        assert!(a.is_ok() && b.is_ok());

        let created = calls.created();
        assert_eq!(created.len(), 2);
        assert_ne!(created[0], created[1]);
        assert_eq!(calls.deletes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancelled_generation_deletes_model_in_background() {
        let (backend, calls) = MockBackend::new(MockMode::Hang);
        let t = templater();

        let result =
            tokio::time::timeout(Duration::from_millis(20), t.generate(&backend, "prompt")).await;
        assert!(result.is_err());
        assert_eq!(calls.creates.load(Ordering::SeqCst), 1);

        for _ in 0..50 {
            if calls.deletes.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(calls.deletes.load(Ordering::SeqCst), 1);
        assert_eq!(calls.created(), calls.deleted());
    }
}
