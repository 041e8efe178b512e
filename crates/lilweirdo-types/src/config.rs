//! Bot configuration types for Lil Weirdo.
//!
//! `BotConfig` represents `lilweirdo.toml`. Every field has a default so an
//! empty (or missing) file yields a working bot.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default fraction of ordinary messages that get a reply.
pub const DEFAULT_RESPONSE_RATE: f64 = 0.05;

/// Default prefix marking a message as a command.
pub const DEFAULT_COMMAND_PREFIX: &str = "~";

/// Default base model for every template.
pub const DEFAULT_MODEL: &str = "mistral";

/// Top-level configuration for the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// Probability in [0, 1] of replying to an ordinary message.
    #[serde(default = "default_response_rate")]
    pub response_rate: f64,

    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,

    #[serde(default = "default_ollama_timeout_secs")]
    pub ollama_timeout_secs: u64,

    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_tag")]
    pub default_tag: String,

    /// Capacity of the shared conversation memory.
    #[serde(default = "default_shared_capacity")]
    pub shared_capacity: usize,

    /// Capacity of each per-author memory.
    #[serde(default = "default_per_entity_capacity")]
    pub per_entity_capacity: usize,
}

fn default_command_prefix() -> String {
    DEFAULT_COMMAND_PREFIX.to_string()
}

fn default_response_rate() -> f64 {
    DEFAULT_RESPONSE_RATE
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_timeout_secs() -> u64 {
    300
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_tag() -> String {
    "latest".to_string()
}

fn default_shared_capacity() -> usize {
    1000
}

fn default_per_entity_capacity() -> usize {
    100
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
            response_rate: default_response_rate(),
            ollama_host: default_ollama_host(),
            ollama_timeout_secs: default_ollama_timeout_secs(),
            default_model: default_model(),
            default_tag: default_tag(),
            shared_capacity: default_shared_capacity(),
            per_entity_capacity: default_per_entity_capacity(),
        }
    }
}

impl BotConfig {
    /// Reject values the bot cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.response_rate) {
            return Err(ConfigError::Invalid(format!(
                "response_rate must be between 0 and 1, got {}",
                self.response_rate
            )));
        }
        if self.command_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "command_prefix must not be empty".to_string(),
            ));
        }
        if self.shared_capacity == 0 || self.per_entity_capacity == 0 {
            return Err(ConfigError::Invalid(
                "memory capacities must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
