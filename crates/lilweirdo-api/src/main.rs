//! Lil Weirdo entry point.
//!
//! Binary name: `lilweirdo`
//!
//! Parses CLI arguments, initializes tracing and the bot, then connects to
//! the Discord gateway and runs until Ctrl+C or SIGTERM.

mod cli;
mod discord;
mod state;

use clap::Parser;
use secrecy::ExposeSecret;
use serenity::all::{Client, GatewayIntents};

use cli::Cli;
use discord::Handler;
use lilweirdo_observe::tracing_setup::{default_filter, init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&default_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(&cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "Lil Weirdo stopped with an error");
    }
    shutdown_tracing();
    result
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let state = AppState::init(&cli.config).await?;

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(state.discord_token.expose_secret(), intents)
        .event_handler(Handler::new(state.bot.clone()))
        .await?;
    let shard_manager = client.shard_manager.clone();

    tracing::info!(
        config = %cli.config.display(),
        prefix = %state.config.command_prefix,
        "Connecting to Discord"
    );
    tokio::select! {
        result = client.start() => result?,
        _ = shutdown_signal() => {
            tracing::info!("Shutting down");
            shard_manager.shutdown_all().await;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
