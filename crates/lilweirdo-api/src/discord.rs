//! Discord adapter: converts serenity events into core calls.

use std::sync::{Arc, Mutex, PoisonError};

use serenity::all::{Context, EventHandler, Message, Ready, Typing};
use tracing::{info, warn};

use lilweirdo_core::bot::Bot;
use lilweirdo_core::bot::sink::ReplySink;
use lilweirdo_types::chat::{Author, ChatMessage, MessageId, ReplyRef, UserId};
use lilweirdo_types::error::PlatformError;

/// Discord's per-message character limit.
const MAX_DISCORD_LEN: usize = 2000;

/// Truncate `s` to Discord's 2000-character limit.
fn truncate(s: &str) -> &str {
    match s.char_indices().nth(MAX_DISCORD_LEN) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

fn reply_ref(message: &Message) -> ReplyRef {
    ReplyRef {
        message_id: MessageId(message.id.get()),
        author_id: UserId(message.author.id.get()),
    }
}

/// Convert a serenity message into the core's view of it.
fn to_chat_message(ctx: &Context, message: &Message) -> ChatMessage {
    ChatMessage {
        id: MessageId(message.id.get()),
        author: Author {
            id: UserId(message.author.id.get()),
            display_name: message.author.display_name().to_string(),
        },
        content: message.content.clone(),
        clean_content: message.content_safe(&ctx.cache),
        mentions: message
            .mentions
            .iter()
            .map(|user| UserId(user.id.get()))
            .collect(),
        reply_to: message.referenced_message.as_deref().map(reply_ref),
    }
}

/// Replies to one inbound Discord message.
pub struct DiscordReplier<'a> {
    ctx: &'a Context,
    source: &'a Message,
    typing: Mutex<Option<Typing>>,
}

impl<'a> DiscordReplier<'a> {
    pub fn new(ctx: &'a Context, source: &'a Message) -> Self {
        Self {
            ctx,
            source,
            typing: Mutex::new(None),
        }
    }

    fn stop_typing(&self) {
        let typing = self
            .typing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(typing) = typing {
            typing.stop();
        }
    }
}

impl ReplySink for DiscordReplier<'_> {
    async fn reply(&self, to: &ChatMessage, text: &str) -> Result<ChatMessage, PlatformError> {
        let content = truncate(text);
        if content.len() < text.len() {
            warn!(chars = text.chars().count(), "Reply over Discord's limit, truncating");
        }

        let result = self.source.reply(self.ctx, content).await;
        self.stop_typing();
        let sent = result.map_err(|e| PlatformError::Send(e.to_string()))?;

        let mut message = to_chat_message(self.ctx, &sent);
        message.reply_to = Some(ReplyRef {
            message_id: to.id,
            author_id: to.author.id,
        });
        Ok(message)
    }

    fn start_typing(&self) {
        let typing = self.source.channel_id.start_typing(&self.ctx.http);
        *self.typing.lock().unwrap_or_else(PoisonError::into_inner) = Some(typing);
    }
}

impl Drop for DiscordReplier<'_> {
    fn drop(&mut self) {
        self.stop_typing();
    }
}

/// serenity event handler driving the bot.
pub struct Handler {
    bot: Arc<Bot>,
}

impl Handler {
    pub fn new(bot: Arc<Bot>) -> Self {
        Self { bot }
    }
}

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Connected to Discord");
        self.bot.set_self_id(UserId(ready.user.id.get()));
    }

    async fn message(&self, ctx: Context, message: Message) {
        let chat = to_chat_message(&ctx, &message);
        let replier = DiscordReplier::new(&ctx, &message);
        self.bot.handle_message(&chat, &replier).await;
    }
}
