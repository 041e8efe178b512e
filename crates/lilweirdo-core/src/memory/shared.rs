//! Shared conversation memory: one bounded sequence for the whole channel.

use std::collections::VecDeque;

use lilweirdo_types::chat::ChatMessage;

use super::prompt_line;

/// Default number of messages retained.
pub const DEFAULT_SHARED_CAPACITY: usize = 1000;

/// Remembers the last N messages regardless of who sent them.
///
/// The bot's own messages are stored exactly like everyone else's.
#[derive(Debug, Clone)]
pub struct SharedHistory {
    capacity: usize,
    history: VecDeque<ChatMessage>,
}

impl SharedHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            history: VecDeque::with_capacity(capacity.min(DEFAULT_SHARED_CAPACITY)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ingest(&mut self, message: &ChatMessage) {
        if self.capacity == 0 {
            return;
        }
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(message.clone());
    }

    pub fn ingest_self(&mut self, message: &ChatMessage) {
        self.ingest(message);
    }

    /// Up to `n` most recent messages, newest first.
    pub fn recent(&self, n: usize) -> Vec<&ChatMessage> {
        self.history.iter().rev().take(n).collect()
    }

    pub fn count(&self) -> usize {
        self.history.len()
    }

    /// Retained messages, oldest first, formatted for a prompt.
    pub fn to_prompt_lines(&self, start_token: &str, end_token: &str) -> Vec<String> {
        self.history
            .iter()
            .map(|msg| prompt_line(msg, start_token, end_token))
            .collect()
    }
}

impl Default for SharedHistory {
    fn default() -> Self {
        Self::new(DEFAULT_SHARED_CAPACITY)
    }
}
