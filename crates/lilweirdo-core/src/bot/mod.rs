//! The orchestrator: routes each inbound message to the command tree or to
//! the sickos.

mod commands;
pub mod sink;
pub mod state;

use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, error, info, trace, warn};

use lilweirdo_types::chat::{ChatMessage, UserId};
use lilweirdo_types::config::BotConfig;
use lilweirdo_types::error::CommandTreeError;

use crate::command::CommandTree;
use crate::llm::box_backend::BoxCompletionBackend;
use crate::llm::templater::Templater;
use crate::llm::templates;
use crate::memory::{HistoryStore, MemoryKind};
use crate::sicko::Sicko;

use self::sink::ReplySink;
use self::state::BotState;

/// Why the bot decided to answer an ordinary message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    ReplyToBot,
    Mention,
    Chance,
}

/// Lil Weirdo itself.
///
/// Owns the sickos, the response policy, and the command tree. Shared
/// behind an `Arc` by the platform adapter; every method takes `&self`.
pub struct Bot {
    sickos: Vec<Sicko>,
    state: RwLock<BotState>,
    backend: Arc<BoxCompletionBackend>,
    cheevos: Templater,
    commands: CommandTree<Bot>,
    self_id: OnceLock<UserId>,
}

impl Bot {
    /// Build the bot with the default roster: `weirdo`, `freak` and `uwu`.
    pub fn new(
        config: &BotConfig,
        backend: Arc<BoxCompletionBackend>,
    ) -> Result<Self, CommandTreeError> {
        let (model, tag) = (config.default_model.as_str(), config.default_tag.as_str());
        let roster = vec![
            Sicko::new(
                "weirdo",
                HistoryStore::with_capacity(MemoryKind::PerEntity, config.per_entity_capacity),
                Arc::new(templates::lil_weirdo(model, tag)),
            ),
            Sicko::new(
                "freak",
                HistoryStore::with_capacity(MemoryKind::Shared, config.shared_capacity),
                Arc::new(templates::lil_freak(model, tag)),
            ),
            Sicko::new(
                "uwu",
                HistoryStore::with_capacity(MemoryKind::Shared, config.shared_capacity),
                Arc::new(templates::lil_owo_freak(model, tag)),
            ),
        ];
        Self::with_roster(roster, templates::cheevos_from(model, tag), config, backend)
    }

    /// Build the bot around an explicit roster. Names must be unique.
    pub fn with_roster(
        sickos: Vec<Sicko>,
        cheevos: Templater,
        config: &BotConfig,
        backend: Arc<BoxCompletionBackend>,
    ) -> Result<Self, CommandTreeError> {
        Ok(Self {
            sickos,
            state: RwLock::new(BotState::new(config.response_rate)),
            backend,
            cheevos,
            commands: commands::command_tree(&config.command_prefix)?,
            self_id: OnceLock::new(),
        })
    }

    /// Record the bot's own user id. Only the first call has any effect.
    pub fn set_self_id(&self, id: UserId) {
        if self.self_id.set(id).is_ok() {
            info!(user = %id, "Learned own user id");
        }
    }

    pub fn self_id(&self) -> Option<UserId> {
        self.self_id.get().copied()
    }

    pub fn response_rate(&self) -> f64 {
        self.state().response_rate
    }

    pub fn pinned(&self) -> Option<String> {
        self.state().pinned.clone()
    }

    pub fn sicko(&self, name: &str) -> Option<&Sicko> {
        self.sickos.iter().find(|s| s.name() == name)
    }

    pub fn sicko_names(&self) -> impl Iterator<Item = &str> {
        self.sickos.iter().map(Sicko::name)
    }

    /// Empty every sicko's memory.
    pub fn forget_all(&self) {
        for sicko in &self.sickos {
            sicko.forget();
        }
    }

    /// Handle one inbound message, replying through `sink` if warranted.
    ///
    /// Never fails: backend and platform errors are logged and the message
    /// is dropped.
    pub async fn handle_message<S: ReplySink>(&self, message: &ChatMessage, sink: &S) {
        let me = self.self_id();
        // Unfiltered only before `ready`, which the gateway sends first.
        if me == Some(message.author.id) {
            trace!(message = %message.id, "Ignoring own message");
            return;
        }

        if let Some(reply) = self.commands.invoke(self, &message.content).await {
            if let Err(e) = sink.reply(message, &reply).await {
                error!(message = %message.id, error = %e, "Failed to send command reply");
            }
            return;
        }

        self.ingest(message);

        let Some(trigger) = self.trigger(message, me) else {
            return;
        };
        let Some(sicko) = self.pick_sicko() else {
            warn!("No sickos to reply with");
            return;
        };
        debug!(sicko = %sicko.name(), ?trigger, author = %message.author.id, "Replying");

        sink.start_typing();
        let text = match sicko.respond_to(&self.backend, message.author.id).await {
            Ok(text) => text,
            Err(e) => {
                warn!(sicko = %sicko.name(), error = %e, "Generation failed, staying quiet");
                return;
            }
        };
        if text.trim().is_empty() {
            debug!(sicko = %sicko.name(), "Generated an empty reply, staying quiet");
            return;
        }

        match sink.reply(message, &text).await {
            Ok(sent) => sicko.ingest_self(&sent),
            Err(e) => error!(sicko = %sicko.name(), error = %e, "Failed to send reply"),
        }
    }

    fn ingest(&self, message: &ChatMessage) {
        let author = message.author.id;
        for sicko in &self.sickos {
            sicko.ingest(message);
            sicko.with_memory(|memory| {
                let preview: Vec<&str> = memory
                    .recent(3, author)
                    .iter()
                    .map(|m| m.clean_content.as_str())
                    .collect();
                debug!(
                    sicko = %sicko.name(),
                    memory = %memory.kind(),
                    author = %author,
                    count = memory.count(author),
                    capacity = memory.capacity(),
                    recent = ?preview,
                    "Ingested message"
                );
            });
        }
    }

    /// Replies to the bot and mentions always trigger; anything else
    /// triggers with probability equal to the response rate.
    fn trigger(&self, message: &ChatMessage, me: Option<UserId>) -> Option<Trigger> {
        if let Some(me) = me {
            if message.is_reply_to(me) {
                return Some(Trigger::ReplyToBot);
            }
            if message.mentions_user(me) {
                return Some(Trigger::Mention);
            }
        }
        let rate = self.response_rate();
        (rand::thread_rng().gen_range(0.0..1.0) < rate).then_some(Trigger::Chance)
    }

    fn pick_sicko(&self) -> Option<&Sicko> {
        if let Some(name) = self.pinned() {
            match self.sicko(&name) {
                Some(sicko) => return Some(sicko),
                None => warn!(sicko = %name, "Pinned sicko is gone, shuffling"),
            }
        }
        self.sickos.choose(&mut rand::thread_rng())
    }

    fn state(&self) -> RwLockReadGuard<'_, BotState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, BotState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("sickos", &self.sickos)
            .field("state", &*self.state())
            .field("backend", &self.backend.name())
            .field("self_id", &self.self_id.get())
            .finish_non_exhaustive()
    }
}
