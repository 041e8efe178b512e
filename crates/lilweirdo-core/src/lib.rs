//! Business logic for Lil Weirdo.
//!
//! Conversation memory, prompt templating with scoped backend models,
//! personalities ("sickos"), the prefix command tree, and the bot that routes
//! every inbound chat message between them.
//!
//! This crate depends only on `lilweirdo-types`. The completion backend and
//! the chat platform are reached through the [`llm::backend::CompletionBackend`]
//! and [`bot::sink::ReplySink`] traits, implemented elsewhere.

pub mod bot;
pub mod command;
pub mod llm;
pub mod memory;
pub mod sicko;

#[cfg(test)]
pub(crate) mod testing;
