//! Conversation memory for personalities.
//!
//! A [`HistoryStore`] is one of two strategies sharing a single contract:
//! - [`SharedHistory`]: one bounded sequence for the whole conversation
//! - [`PerEntityHistory`]: one bounded sequence per author
//!
//! Every sequence is a strict FIFO ring buffer. Going over capacity silently
//! drops the oldest message.

pub mod per_entity;
pub mod shared;

use std::fmt;

use lilweirdo_types::chat::{ChatMessage, UserId};

pub use per_entity::PerEntityHistory;
pub use shared::SharedHistory;

/// Which memory strategy a personality uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryKind {
    Shared,
    PerEntity,
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryKind::Shared => write!(f, "shared"),
            MemoryKind::PerEntity => write!(f, "per_entity"),
        }
    }
}

/// Bounded message memory, selected by [`MemoryKind`].
///
/// The `key` arguments name an author. The shared strategy ignores them.
#[derive(Debug, Clone)]
pub enum HistoryStore {
    Shared(SharedHistory),
    PerEntity(PerEntityHistory),
}

impl HistoryStore {
    /// Create an empty store with the strategy's default capacity.
    pub fn new(kind: MemoryKind) -> Self {
        match kind {
            MemoryKind::Shared => HistoryStore::Shared(SharedHistory::default()),
            MemoryKind::PerEntity => HistoryStore::PerEntity(PerEntityHistory::default()),
        }
    }

    /// Create an empty store holding at most `capacity` messages per sequence.
    pub fn with_capacity(kind: MemoryKind, capacity: usize) -> Self {
        match kind {
            MemoryKind::Shared => HistoryStore::Shared(SharedHistory::new(capacity)),
            MemoryKind::PerEntity => HistoryStore::PerEntity(PerEntityHistory::new(capacity)),
        }
    }

    pub fn kind(&self) -> MemoryKind {
        match self {
            HistoryStore::Shared(_) => MemoryKind::Shared,
            HistoryStore::PerEntity(_) => MemoryKind::PerEntity,
        }
    }

    pub fn capacity(&self) -> usize {
        match self {
            HistoryStore::Shared(store) => store.capacity(),
            HistoryStore::PerEntity(store) => store.capacity(),
        }
    }

    /// A fresh, empty store with the same strategy and capacity.
    pub fn emptied(&self) -> Self {
        Self::with_capacity(self.kind(), self.capacity())
    }

    /// Record an inbound message.
    pub fn ingest(&mut self, message: &ChatMessage) {
        match self {
            HistoryStore::Shared(store) => store.ingest(message),
            HistoryStore::PerEntity(store) => store.ingest(message),
        }
    }

    /// Record a message the bot itself sent.
    pub fn ingest_self(&mut self, message: &ChatMessage) {
        match self {
            HistoryStore::Shared(store) => store.ingest_self(message),
            HistoryStore::PerEntity(store) => store.ingest_self(message),
        }
    }

    /// Up to `n` most recent messages for `key`, newest first.
    pub fn recent(&self, n: usize, key: UserId) -> Vec<&ChatMessage> {
        match self {
            HistoryStore::Shared(store) => store.recent(n),
            HistoryStore::PerEntity(store) => store.recent(n, key),
        }
    }

    /// Number of retained messages for `key`.
    pub fn count(&self, key: UserId) -> usize {
        match self {
            HistoryStore::Shared(store) => store.count(),
            HistoryStore::PerEntity(store) => store.count(key),
        }
    }

    /// Retained messages for `key`, oldest first, as
    /// `"{start_token} {name}: {text} {end_token}"` lines.
    pub fn to_prompt_lines(&self, key: UserId, start_token: &str, end_token: &str) -> Vec<String> {
        match self {
            HistoryStore::Shared(store) => store.to_prompt_lines(start_token, end_token),
            HistoryStore::PerEntity(store) => store.to_prompt_lines(key, start_token, end_token),
        }
    }
}

pub(crate) fn prompt_line(message: &ChatMessage, start_token: &str, end_token: &str) -> String {
    format!(
        "{start_token} {}: {} {end_token}",
        message.author.display_name, message.clean_content
    )
}
