//! Outbound side of the chat platform.

use std::future::Future;

use lilweirdo_types::chat::ChatMessage;
use lilweirdo_types::error::PlatformError;

/// Sends replies on behalf of the bot.
///
/// One sink is bound to each inbound message by the platform adapter.
pub trait ReplySink: Send + Sync {
    /// Reply to `to` with `text`, returning the message that was sent.
    ///
    /// The returned message's `reply_to` must point at `to` so per-author
    /// memory can file it under the right thread.
    fn reply(
        &self,
        to: &ChatMessage,
        text: &str,
    ) -> impl Future<Output = Result<ChatMessage, PlatformError>> + Send;

    /// Signal that a reply is being generated.
    fn start_typing(&self) {}
}
