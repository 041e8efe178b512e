//! Prefix command routing.
//!
//! Commands live in a [`CommandTree`]: a trie of whitespace-separated path
//! segments whose interior nodes are groups and whose leaves are
//! [`Command`]s. Help text is generated from the tree itself.
//!
//! Handlers receive an explicit context `&C` (the bot) rather than closing
//! over it, so the tree can be stored inside the context it routes for.

pub mod tree;

use std::future::Future;
use std::pin::Pin;

use lilweirdo_types::error::CommandError;

pub use tree::CommandTree;

/// Future returned by a command handler.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<String, CommandError>> + Send + 'a>>;

/// A command handler: context plus the unconsumed argument text.
pub type Handler<C> = for<'a> fn(&'a C, &'a str) -> HandlerFuture<'a>;

/// Help text for a command, either fixed or rendered from live state.
pub enum HelpText<C> {
    Fixed(String),
    Live(fn(&C) -> String),
}

impl<C> HelpText<C> {
    pub fn render(&self, ctx: &C) -> String {
        match self {
            HelpText::Fixed(text) => text.clone(),
            HelpText::Live(render) => render(ctx),
        }
    }
}

impl<C> From<&str> for HelpText<C> {
    fn from(text: &str) -> Self {
        HelpText::Fixed(text.to_string())
    }
}

/// A registered leaf command.
pub struct Command<C> {
    /// Full path, e.g. "sicko set".
    pub name: String,
    pub params: Vec<String>,
    pub help: HelpText<C>,
    pub handler: Handler<C>,
}

impl<C> Command<C> {
    /// `* {prefix}**{name}** <param>...: {help}`
    pub fn help_line(&self, prefix: &str, ctx: &C) -> String {
        let params: String = self.params.iter().map(|p| format!(" <{p}>")).collect();
        format!(
            "* {prefix}**{}**{params}: {}",
            self.name,
            self.help.render(ctx)
        )
    }
}

impl<C> std::fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
