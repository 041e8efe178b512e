//! Chat entities as seen by the core.
//!
//! These mirror the parts of a platform message the bot actually reads. The
//! platform adapter converts its own message type into a [`ChatMessage`]
//! before handing it to the core; the core never talks to the platform
//! directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform-assigned message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The author of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    /// Global display name, falling back to the account name.
    pub display_name: String,
}

/// A resolved reply reference: the message being replied to and its author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRef {
    pub message_id: MessageId,
    pub author_id: UserId,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub author: Author,
    /// Raw text, used for command detection.
    pub content: String,
    /// Text with mentions resolved to names, used when building prompts.
    pub clean_content: String,
    /// Users mentioned in this message.
    #[serde(default)]
    pub mentions: Vec<UserId>,
    /// Present when this message is a reply and the referenced message resolved.
    #[serde(default)]
    pub reply_to: Option<ReplyRef>,
}

impl ChatMessage {
    /// Whether `user` is mentioned in this message.
    pub fn mentions_user(&self, user: UserId) -> bool {
        self.mentions.contains(&user)
    }

    /// Whether this message is a reply to a message authored by `user`.
    pub fn is_reply_to(&self, user: UserId) -> bool {
        self.reply_to.is_some_and(|r| r.author_id == user)
    }
}
