//! The bot's chat commands.

use tracing::{info, warn};

use lilweirdo_types::config::DEFAULT_RESPONSE_RATE;
use lilweirdo_types::error::{CommandError, CommandTreeError};

use crate::command::{CommandTree, HandlerFuture, HelpText};

use super::Bot;

const HELP_HEADER: &str = "# What's good?\nThis is Lil Weirdo, a bot which talks back. There are many personalities defined within Lil Weirdo, known as its various \"sickos\". Each sicko is defined by an LLM model, a prompt template, and a unique memory recording scheme. Every message that is sent may be recorded into a sicko's memory. There are a couple of commands defined for your consumption pleasure:\n";

const HELP_FOOTER: &str = "\nLil Weirdo is an open source project, more information can be found at https://github.com/DataKinds/lilweirdo.";

pub(super) fn command_tree(prefix: &str) -> Result<CommandTree<Bot>, CommandTreeError> {
    let mut tree = CommandTree::new(prefix).with_banner(HELP_HEADER, HELP_FOOTER);
    tree.add("help", &[], "Show this help message.", help)?;
    tree.add("amnesia", &[], "Deletes all of the sickos' memories.", amnesia)?;
    tree.add(
        "responserate",
        &["rate"],
        HelpText::Live(responserate_help),
        responserate,
    )?;
    tree.add("sicko list", &[], "Lists the available sickos", sicko_list)?;
    tree.add(
        "sicko current",
        &[],
        HelpText::Live(sicko_current_help),
        sicko_current,
    )?;
    tree.add(
        "sicko shuffle",
        &[],
        "Sets the sickos to shuffle which one responds to a given message",
        sicko_shuffle,
    )?;
    tree.add(
        "sicko set",
        &["name"],
        "Sets the currently responding sicko to the given named sicko",
        sicko_set,
    )?;
    tree.add(
        "cheevosfrom",
        &["game title"],
        "What's the list of achievements from your favorite game?",
        cheevos_from,
    )?;
    Ok(tree)
}

fn responserate_help(bot: &Bot) -> String {
    format!(
        "Sets the percent of messages the sickos respond to, from 0 to 1. Currently set to {}, defaults to {}",
        bot.response_rate(),
        DEFAULT_RESPONSE_RATE
    )
}

fn sicko_current_help(bot: &Bot) -> String {
    format!(
        "Lists the currently replying sicko. It is currently `{}`",
        bot.pinned().as_deref().unwrap_or("shuffle")
    )
}

fn sicko_names(bot: &Bot) -> String {
    bot.sicko_names()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn help<'a>(bot: &'a Bot, _args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(bot.commands.help(bot)) })
}

fn amnesia<'a>(bot: &'a Bot, _args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        info!("Clearing memory");
        bot.forget_all();
        Ok("Uhhh I forgor >:3".to_string())
    })
}

fn responserate<'a>(bot: &'a Bot, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let raw = args
            .split_whitespace()
            .next()
            .ok_or(CommandError::MissingArgument("rate"))?;
        let rate: f64 = raw
            .parse()
            .map_err(|_| CommandError::InvalidArgument(raw.to_string()))?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(CommandError::InvalidArgument(raw.to_string()));
        }
        bot.state_mut().response_rate = rate;
        info!(rate, "Response rate changed");
        Ok(format!("Set response rate to {rate}"))
    })
}

fn sicko_list<'a>(bot: &'a Bot, _args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(format!("Currently available sickos: {}", sicko_names(bot))) })
}

fn sicko_current<'a>(bot: &'a Bot, _args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        Ok(match bot.pinned() {
            None => "Currently set to shuffle all sickos each reply.".to_string(),
            Some(name) => format!("The sicko that's replying to you is `{name}`."),
        })
    })
}

fn sicko_shuffle<'a>(bot: &'a Bot, _args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        bot.state_mut().pinned = None;
        info!("Shuffling sickos");
        Ok("Shuffling sickos.".to_string())
    })
}

fn sicko_set<'a>(bot: &'a Bot, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let name = args
            .split_whitespace()
            .next()
            .ok_or(CommandError::MissingArgument("name"))?;
        if bot.sicko(name).is_none() {
            return Ok(format!(
                "Sicko `{name}` not available.\nCurrently available sickos: {}",
                sicko_names(bot)
            ));
        }
        bot.state_mut().pinned = Some(name.to_string());
        info!(sicko = %name, "Pinned sicko");
        Ok(format!("Switched to `{name}`."))
    })
}

fn cheevos_from<'a>(bot: &'a Bot, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let title = args.trim();
        if title.is_empty() {
            return Err(CommandError::MissingArgument("game title"));
        }
        Ok(match bot.cheevos.generate(&bot.backend, title).await {
            Ok(response) => format!("Achievements from {title}:\n{response}"),
            Err(e) => {
                warn!(title = %title, error = %e, "Achievement generation failed");
                format!("Couldn't dig up any achievements from {title} right now, try again later.")
            }
        })
    })
}
