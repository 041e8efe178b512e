//! BoxCompletionBackend -- object-safe dynamic dispatch wrapper for CompletionBackend.
//!
//! 1. Define an object-safe `CompletionBackendDyn` trait with boxed futures
//! 2. Blanket-impl `CompletionBackendDyn` for all `T: CompletionBackend`
//! 3. `BoxCompletionBackend` wraps `Box<dyn CompletionBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use lilweirdo_types::llm::{BackendError, ModelConfig};

use super::backend::CompletionBackend;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`CompletionBackend`] with boxed futures.
pub trait CompletionBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn create_model_boxed<'a>(
        &'a self,
        name: &'a str,
        config: &'a ModelConfig,
    ) -> BoxFuture<'a, Result<(), BackendError>>;

    fn generate_boxed<'a>(
        &'a self,
        name: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, BackendError>>;

    fn delete_model_boxed<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), BackendError>>;
}

impl<T: CompletionBackend> CompletionBackendDyn for T {
    fn name(&self) -> &str {
        CompletionBackend::name(self)
    }

    fn create_model_boxed<'a>(
        &'a self,
        name: &'a str,
        config: &'a ModelConfig,
    ) -> BoxFuture<'a, Result<(), BackendError>> {
        Box::pin(self.create_model(name, config))
    }

    fn generate_boxed<'a>(
        &'a self,
        name: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, BackendError>> {
        Box::pin(self.generate(name, prompt))
    }

    fn delete_model_boxed<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), BackendError>> {
        Box::pin(self.delete_model(name))
    }
}

/// Type-erased completion backend.
///
/// `CompletionBackend` uses RPITIT and cannot be a trait object directly;
/// this wrapper provides the same methods over `dyn CompletionBackendDyn`.
pub struct BoxCompletionBackend {
    inner: Box<dyn CompletionBackendDyn + Send + Sync>,
}

impl BoxCompletionBackend {
    /// Wrap a concrete `CompletionBackend` in a type-erased box.
    pub fn new<T: CompletionBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn create_model(&self, name: &str, config: &ModelConfig) -> Result<(), BackendError> {
        self.inner.create_model_boxed(name, config).await
    }

    pub async fn generate(&self, name: &str, prompt: &str) -> Result<String, BackendError> {
        self.inner.generate_boxed(name, prompt).await
    }

    pub async fn delete_model(&self, name: &str) -> Result<(), BackendError> {
        self.inner.delete_model_boxed(name).await
    }
}
