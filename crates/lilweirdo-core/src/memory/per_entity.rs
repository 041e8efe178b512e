//! Per-author memory: a separate bounded thread for everyone who talks.

use std::collections::{HashMap, VecDeque};

use lilweirdo_types::chat::{ChatMessage, UserId};

use super::prompt_line;

/// Default number of messages retained per author.
pub const DEFAULT_PER_ENTITY_CAPACITY: usize = 100;

/// Keeps each author's conversation thread apart from everyone else's.
///
/// Threads are created lazily on an author's first message. The bot's own
/// messages only land in a thread when they reply to that thread's author.
#[derive(Debug, Clone)]
pub struct PerEntityHistory {
    capacity: usize,
    threads: HashMap<UserId, VecDeque<ChatMessage>>,
}

impl PerEntityHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            threads: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ingest(&mut self, message: &ChatMessage) {
        self.append(message.author.id, message);
    }

    /// Record one of our own messages into the thread of the author it
    /// replies to. Messages that are not replies, or that reply to someone
    /// we have never heard from, are dropped.
    pub fn ingest_self(&mut self, message: &ChatMessage) {
        let Some(reply) = message.reply_to else {
            return;
        };
        if self.threads.contains_key(&reply.author_id) {
            self.append(reply.author_id, message);
        }
    }

    /// Up to `n` of `author`'s most recent messages, newest first.
    pub fn recent(&self, n: usize, author: UserId) -> Vec<&ChatMessage> {
        self.threads
            .get(&author)
            .map(|thread| thread.iter().rev().take(n).collect())
            .unwrap_or_default()
    }

    pub fn count(&self, author: UserId) -> usize {
        self.threads.get(&author).map_or(0, VecDeque::len)
    }

    /// `author`'s retained messages, oldest first, formatted for a prompt.
    pub fn to_prompt_lines(&self, author: UserId, start_token: &str, end_token: &str) -> Vec<String> {
        self.threads
            .get(&author)
            .map(|thread| {
                thread
                    .iter()
                    .map(|msg| prompt_line(msg, start_token, end_token))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn append(&mut self, key: UserId, message: &ChatMessage) {
        let capacity = self.capacity;
        if capacity == 0 {
            return;
        }
        let thread = self
            .threads
            .entry(key)
            .or_insert_with(|| VecDeque::with_capacity(capacity));
        if thread.len() == capacity {
            thread.pop_front();
        }
        thread.push_back(message.clone());
    }
}

impl Default for PerEntityHistory {
    fn default() -> Self {
        Self::new(DEFAULT_PER_ENTITY_CAPACITY)
    }
}
