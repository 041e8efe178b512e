//! Mutable orchestrator state, changed only by command handlers.

/// Response policy shared by the command handlers and the reply path.
#[derive(Debug, Clone, PartialEq)]
pub struct BotState {
    /// Probability in [0, 1] of replying to an ordinary message.
    pub response_rate: f64,
    /// Sicko answering every reply, or `None` to pick one at random each time.
    pub pinned: Option<String>,
}

impl BotState {
    pub fn new(response_rate: f64) -> Self {
        Self {
            response_rate,
            pinned: None,
        }
    }
}
