//! Application state wiring the bot together.
//!
//! AppState pins the core [`Bot`] to the concrete Ollama backend and holds
//! what the gateway client needs to connect.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use secrecy::SecretString;

use lilweirdo_core::bot::Bot;
use lilweirdo_core::llm::box_backend::BoxCompletionBackend;
use lilweirdo_infra::config::{apply_env_overrides, load_bot_config, load_discord_token};
use lilweirdo_infra::llm::ollama::OllamaBackend;
use lilweirdo_types::config::BotConfig;

/// Everything the running bot needs.
pub struct AppState {
    pub bot: Arc<Bot>,
    pub config: BotConfig,
    pub discord_token: SecretString,
}

impl AppState {
    /// Load config, read the token, connect the backend, build the bot.
    pub async fn init(config_path: &Path) -> anyhow::Result<Self> {
        let env = |key: &str| std::env::var(key).ok();

        let config = load_bot_config(config_path)
            .await
            .with_context(|| format!("loading {}", config_path.display()))?;
        let config = apply_env_overrides(config, env);
        let discord_token = load_discord_token(env)?;

        let backend = OllamaBackend::new(
            &config.ollama_host,
            Duration::from_secs(config.ollama_timeout_secs),
        )?;
        tracing::info!(
            host = %backend.base_url(),
            model = %format!("{}:{}", config.default_model, config.default_tag),
            "Using Ollama backend"
        );
        let backend = Arc::new(BoxCompletionBackend::new(backend));

        let bot = Bot::new(&config, backend).context("registering commands")?;
        tracing::info!(
            prefix = %config.command_prefix,
            response_rate = config.response_rate,
            sickos = ?bot.sicko_names().collect::<Vec<_>>(),
            "Bot ready"
        );

        Ok(Self {
            bot: Arc::new(bot),
            config,
            discord_token,
        })
    }
}
