//! Shared test doubles for the core crate.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lilweirdo_types::chat::{Author, ChatMessage, MessageId, ReplyRef, UserId};
use lilweirdo_types::error::PlatformError;
use lilweirdo_types::llm::{BackendError, ModelConfig};

use crate::bot::sink::ReplySink;
use crate::llm::backend::CompletionBackend;
use crate::llm::box_backend::BoxCompletionBackend;

/// A plain message from `author`, displayed as `user{id}`.
pub fn message(id: u64, author: UserId, text: &str) -> ChatMessage {
    ChatMessage {
        id: MessageId(id),
        author: Author {
            id: author,
            display_name: format!("user{}", author.0),
        },
        content: text.to_string(),
        clean_content: text.to_string(),
        mentions: Vec::new(),
        reply_to: None,
    }
}

/// A message from `bot` replying to message `replied_id` by `replied_author`.
pub fn bot_reply(
    id: u64,
    bot: UserId,
    text: &str,
    replied_id: u64,
    replied_author: UserId,
) -> ChatMessage {
    let mut msg = message(id, bot, text);
    msg.author.display_name = "Lil Weirdo".to_string();
    msg.reply_to = Some(ReplyRef {
        message_id: MessageId(replied_id),
        author_id: replied_author,
    });
    msg
}

/// How the mock backend behaves.
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Every generation returns this text.
    Reply(String),
    /// Generation fails as if the backend went away.
    Fail,
    /// Model registration fails with HTTP 500.
    FailCreate,
    /// Generation never completes.
    Hang,
}

/// What the mock backend was asked to do.
#[derive(Debug, Default)]
pub struct BackendCalls {
    pub creates: AtomicUsize,
    pub generates: AtomicUsize,
    pub deletes: AtomicUsize,
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl BackendCalls {
    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    /// Deleted model names, in the order they were created.
    pub fn deleted(&self) -> Vec<String> {
        let created = self.created();
        let deleted = self.deleted.lock().unwrap();
        created.into_iter().filter(|name| deleted.contains(name)).collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

pub struct MockBackend {
    mode: MockMode,
    calls: Arc<BackendCalls>,
}

impl MockBackend {
    pub fn new(mode: MockMode) -> (Arc<BoxCompletionBackend>, Arc<BackendCalls>) {
        let calls = Arc::new(BackendCalls::default());
        let backend = MockBackend {
            mode,
            calls: Arc::clone(&calls),
        };
        (Arc::new(BoxCompletionBackend::new(backend)), calls)
    }
}

impl CompletionBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_model(&self, name: &str, _config: &ModelConfig) -> Result<(), BackendError> {
        self.calls.creates.fetch_add(1, Ordering::SeqCst);
        if matches!(self.mode, MockMode::FailCreate) {
            return Err(BackendError::Status {
                status: 500,
                body: "model create failed".to_string(),
            });
        }
        self.calls.created.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn generate(&self, _name: &str, prompt: &str) -> Result<String, BackendError> {
        self.calls.generates.fetch_add(1, Ordering::SeqCst);
        self.calls.prompts.lock().unwrap().push(prompt.to_string());
        match &self.mode {
            MockMode::Reply(text) => Ok(text.clone()),
            MockMode::Fail => Err(BackendError::Unreachable("connection refused".to_string())),
            MockMode::FailCreate => unreachable!("generate after failed create"),
            MockMode::Hang => std::future::pending().await,
        }
    }

    async fn delete_model(&self, name: &str) -> Result<(), BackendError> {
        self.calls.deletes.fetch_add(1, Ordering::SeqCst);
        self.calls.deleted.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

/// Records replies instead of sending them.
pub struct MockSink {
    bot: UserId,
    fail: bool,
    next_id: AtomicU64,
    pub typing: AtomicUsize,
    sent: Mutex<Vec<(MessageId, String)>>,
}

impl MockSink {
    pub fn new(bot: UserId) -> Self {
        Self {
            bot,
            fail: false,
            next_id: AtomicU64::new(10_000),
            typing: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A sink whose every send fails.
    pub fn failing(bot: UserId) -> Self {
        Self {
            fail: true,
            ..Self::new(bot)
        }
    }

    /// Texts sent so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }

    /// `(replied-to message, text)` pairs sent so far.
    pub fn sent(&self) -> Vec<(MessageId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ReplySink for MockSink {
    async fn reply(&self, to: &ChatMessage, text: &str) -> Result<ChatMessage, PlatformError> {
        if self.fail {
            return Err(PlatformError::Send("missing permissions".to_string()));
        }
        self.sent.lock().unwrap().push((to.id, text.to_string()));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(bot_reply(id, self.bot, text, to.id.0, to.author.id))
    }

    fn start_typing(&self) {
        self.typing.fetch_add(1, Ordering::SeqCst);
    }
}
