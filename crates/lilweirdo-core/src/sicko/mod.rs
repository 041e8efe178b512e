//! Personalities ("sickos").
//!
//! A [`Sicko`] pairs an exclusively owned [`HistoryStore`] with a shared
//! [`Templater`]. It turns what it remembers about a user into a prompt and
//! asks the backend for a reply. Recording the reply it sent is left to the
//! caller, because only the caller learns the platform id of the sent message.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use lilweirdo_types::chat::{ChatMessage, UserId};
use lilweirdo_types::llm::BackendError;

use crate::llm::box_backend::BoxCompletionBackend;
use crate::llm::templater::Templater;
use crate::memory::HistoryStore;

/// A named voice: one memory strategy plus one prompt template.
pub struct Sicko {
    name: String,
    memory: Mutex<HistoryStore>,
    templater: Arc<Templater>,
}

impl Sicko {
    pub fn new(name: impl Into<String>, memory: HistoryStore, templater: Arc<Templater>) -> Self {
        Self {
            name: name.into(),
            memory: Mutex::new(memory),
            templater,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn templater(&self) -> &Arc<Templater> {
        &self.templater
    }

    /// Record an inbound message.
    pub fn ingest(&self, message: &ChatMessage) {
        self.memory().ingest(message);
    }

    /// Record a reply this sicko sent.
    pub fn ingest_self(&self, message: &ChatMessage) {
        self.memory().ingest_self(message);
    }

    /// Replace the memory with an empty store of the same kind and capacity.
    /// The template binding is untouched.
    pub fn forget(&self) {
        let mut memory = self.memory();
        *memory = memory.emptied();
    }

    /// Read the memory without holding the lock past `f`.
    pub fn with_memory<R>(&self, f: impl FnOnce(&HistoryStore) -> R) -> R {
        f(&self.memory())
    }

    /// Build the prompt for replying to `user`.
    ///
    /// With fewer than two remembered lines, an empty placeholder line is
    /// put in front so the backend always sees a well-formed history. A cue
    /// naming the template's persona, not the sicko, is appended last.
    pub fn build_prompt(&self, user: UserId) -> String {
        let t = &self.templater;
        let mut lines =
            self.with_memory(|memory| memory.to_prompt_lines(user, t.start_token(), t.end_token()));
        if lines.len() < 2 {
            lines.insert(0, String::new());
        }
        lines.push(format!("{} {}:", t.start_token(), t.persona()));
        lines.join(t.separator())
    }

    /// Generate a reply to `user` from what this sicko remembers.
    pub async fn respond_to(
        &self,
        backend: &Arc<BoxCompletionBackend>,
        user: UserId,
    ) -> Result<String, BackendError> {
        let prompt = self.build_prompt(user);
        debug!(sicko = %self.name, user = %user, lines = prompt.lines().count(), "Responding");
        self.templater.generate(backend, &prompt).await
    }

    fn memory(&self) -> MutexGuard<'_, HistoryStore> {
        self.memory.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Sicko {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sicko")
            .field("name", &self.name)
            .field("memory", &self.memory().kind())
            .field("persona", &self.templater.persona())
            .finish()
    }
}
