//! Bot configuration loader for Lil Weirdo.
//!
//! Reads `lilweirdo.toml` and deserializes it into [`BotConfig`]. A missing
//! file means "all defaults"; a file that exists but does not parse or
//! validate is an error.

use std::path::Path;

use secrecy::SecretString;

use lilweirdo_types::config::BotConfig;
use lilweirdo_types::error::ConfigError;

/// Environment variable holding the Discord bot token.
pub const DISCORD_TOKEN_ENV: &str = "DISCORD_TOKEN";

/// Environment variable overriding `ollama_host`.
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

/// Load and validate the bot configuration at `path`.
pub async fn load_bot_config(path: &Path) -> Result<BotConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return Ok(BotConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    let config: BotConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    tracing::info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Apply environment overrides. `lookup` is usually `|k| std::env::var(k).ok()`.
pub fn apply_env_overrides(
    mut config: BotConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> BotConfig {
    if let Some(host) = lookup(OLLAMA_HOST_ENV).filter(|h| !h.trim().is_empty()) {
        tracing::debug!(host = %host, "Ollama host overridden from environment");
        config.ollama_host = host;
    }
    config
}

/// Read the Discord token. Never logged.
pub fn load_discord_token(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    lookup(DISCORD_TOKEN_ENV)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .map(SecretString::from)
        .ok_or(ConfigError::Missing(DISCORD_TOKEN_ENV))
}
