//! The command trie and its dispatcher.

use tracing::{debug, info};

use lilweirdo_types::error::CommandTreeError;

use super::{Command, Handler, HelpText};

enum Node<C> {
    Branch(Branch<C>),
    Leaf(Command<C>),
}

/// A command group. Children keep registration order so help output is
/// stable.
struct Branch<C> {
    children: Vec<(String, Node<C>)>,
}

impl<C> Default for Branch<C> {
    fn default() -> Self {
        Self {
            children: Vec::new(),
        }
    }
}

impl<C> Branch<C> {
    fn get(&self, segment: &str) -> Option<&Node<C>> {
        self.children
            .iter()
            .find(|(name, _)| name == segment)
            .map(|(_, node)| node)
    }

    fn child_or_insert_branch(&mut self, segment: &str) -> &mut Node<C> {
        let index = match self.children.iter().position(|(name, _)| name == segment) {
            Some(index) => index,
            None => {
                self.children
                    .push((segment.to_string(), Node::Branch(Branch::default())));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }

    fn help_lines(&self, prefix: &str, ctx: &C, lines: &mut Vec<String>) {
        for (_, node) in &self.children {
            match node {
                Node::Branch(branch) => branch.help_lines(prefix, ctx, lines),
                Node::Leaf(command) => lines.push(command.help_line(prefix, ctx)),
            }
        }
    }
}

/// Prefix command dispatcher with generated help.
///
/// Built once at startup. Registration mistakes are returned from
/// [`CommandTree::add`] and are meant to abort startup.
pub struct CommandTree<C> {
    prefix: String,
    banner: Option<(String, String)>,
    root: Branch<C>,
}

impl<C> CommandTree<C> {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            banner: None,
            root: Branch::default(),
        }
    }

    /// Text wrapped around the full help listing.
    pub fn with_banner(mut self, header: impl Into<String>, footer: impl Into<String>) -> Self {
        self.banner = Some((header.into(), footer.into()));
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `text` is addressed to the command tree at all.
    pub fn is_command(&self, text: &str) -> bool {
        text.starts_with(self.prefix.as_str())
    }

    /// Register `handler` at the whitespace-separated `path`.
    ///
    /// Interior segments create groups as needed. Fails if an interior
    /// segment is already a command, or if something already lives at `path`.
    pub fn add(
        &mut self,
        path: &str,
        params: &[&str],
        help: impl Into<HelpText<C>>,
        handler: Handler<C>,
    ) -> Result<(), CommandTreeError> {
        let segments: Vec<&str> = path.split_whitespace().collect();
        let Some((last, groups)) = segments.split_last() else {
            return Err(CommandTreeError::EmptyPath);
        };

        let mut branch = &mut self.root;
        for segment in groups {
            branch = match branch.child_or_insert_branch(segment) {
                Node::Branch(child) => child,
                Node::Leaf(_) => {
                    return Err(CommandTreeError::LeafAsBranch {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    });
                }
            };
        }

        if branch.get(last).is_some() {
            return Err(CommandTreeError::Occupied {
                path: path.to_string(),
            });
        }

        branch.children.push((
            last.to_string(),
            Node::Leaf(Command {
                name: segments.join(" "),
                params: params.iter().map(|p| p.to_string()).collect(),
                help: help.into(),
                handler,
            }),
        ));
        Ok(())
    }

    /// Full help: every command, wrapped in the banner if one is set.
    pub fn help(&self, ctx: &C) -> String {
        let lines = self.branch_help(&self.root, ctx);
        match &self.banner {
            Some((header, footer)) => format!("{header}\n{lines}\n{footer}"),
            None => lines,
        }
    }

    fn branch_help(&self, branch: &Branch<C>, ctx: &C) -> String {
        let mut lines = Vec::new();
        branch.help_lines(&self.prefix, ctx, &mut lines);
        lines.join("\n")
    }

    /// Route `text` to a command.
    ///
    /// Returns `None` when `text` lacks the prefix and should be treated as
    /// chat. Otherwise returns the reply: the handler's output, the
    /// command's usage line if the handler rejected its arguments, or group
    /// help if the path stopped short or went astray.
    ///
    /// Segments are separated by runs of whitespace. Whatever follows the
    /// leaf is handed to the handler as-is, minus the separating whitespace.
    pub async fn invoke(&self, ctx: &C, text: &str) -> Option<String> {
        let body = text.strip_prefix(self.prefix.as_str())?;

        let mut branch = &self.root;
        let mut rest = body;
        let mut depth = 0;
        loop {
            let (segment, after) = next_segment(rest);
            if segment.is_empty() {
                debug!(command = %body, "Incomplete command");
                return Some(if depth == 0 {
                    self.help(ctx)
                } else {
                    self.branch_help(branch, ctx)
                });
            }
            match branch.get(segment) {
                None if depth == 0 => {
                    debug!(command = %body, "Unknown command");
                    return Some(self.help(ctx));
                }
                None => {
                    debug!(command = %body, segment = %segment, "Unknown subcommand");
                    return Some(self.branch_help(branch, ctx));
                }
                Some(Node::Branch(child)) => {
                    branch = child;
                    rest = after;
                    depth += 1;
                }
                Some(Node::Leaf(command)) => {
                    let args = after.trim_start();
                    info!(command = %command.name, args = %args, "Invoking command");
                    return Some(match (command.handler)(ctx, args).await {
                        Ok(reply) => reply,
                        Err(e) => {
                            debug!(command = %command.name, error = %e, "Command rejected its arguments");
                            command.help_line(&self.prefix, ctx)
                        }
                    });
                }
            }
        }
    }
}

/// Split off the next whitespace-delimited segment of `text`.
///
/// Returns the segment and the untouched remainder after it. The segment is
/// empty once `text` holds only whitespace.
fn next_segment(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], &text[end..]),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::HandlerFuture;
    use lilweirdo_types::error::CommandError;
    use std::sync::Mutex;

    /// Records every handler call as `"{command}|{args}"`.
    #[derive(Default)]
    struct Ctx {
        calls: Mutex<Vec<String>>,
        mood: Mutex<String>,
    }

    impl Ctx {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn set<'a>(ctx: &'a Ctx, args: &'a str) -> HandlerFuture<'a> {
        Box::pin(async move {
            ctx.calls.lock().unwrap().push(format!("set|{args}"));
            Ok(format!("set {args}"))
        })
    }

    fn list<'a>(ctx: &'a Ctx, args: &'a str) -> HandlerFuture<'a> {
        Box::pin(async move {
            ctx.calls.lock().unwrap().push(format!("list|{args}"));
            Ok("listed".to_string())
        })
    }

    fn picky<'a>(ctx: &'a Ctx, args: &'a str) -> HandlerFuture<'a> {
        Box::pin(async move {
            ctx.calls.lock().unwrap().push(format!("picky|{args}"));
            args.parse::<u32>()
                .map(|n| n.to_string())
                .map_err(|_| CommandError::InvalidArgument(args.to_string()))
        })
    }

    fn mood_help(ctx: &Ctx) -> String {
        format!("Mood is {}", ctx.mood.lock().unwrap())
    }

    fn tree() -> CommandTree<Ctx> {
        let mut tree = CommandTree::new("~").with_banner("HEAD", "FOOT");
        tree.add("sicko set", &["name"], "Sets the sicko", set).unwrap();
        tree.add("sicko list", &[], "Lists sickos", list).unwrap();
        tree.add("picky", &["n"], HelpText::Live(mood_help), picky).unwrap();
        tree
    }

    #[tokio::test]
    async fn test_not_prefixed_is_not_a_command() {
        let ctx = Ctx::default();
        let tree = tree();
        assert!(!tree.is_command("hello ~sicko"));
        assert_eq!(tree.invoke(&ctx, "hello ~sicko").await, None);
        assert!(ctx.calls().is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_path_returns_group_help_without_invoking() {
        let ctx = Ctx::default();
        let reply = tree().invoke(&ctx, "~sicko").await.unwrap();

        assert_eq!(
            reply,
            "* ~**sicko set** <name>: Sets the sicko\n* ~**sicko list**: Lists sickos"
        );
        assert!(ctx.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_subcommand_returns_group_help() {
        let ctx = Ctx::default();
        let reply = tree().invoke(&ctx, "~sicko explode").await.unwrap();
        assert!(reply.contains("sicko set") && reply.contains("sicko list"));
        assert!(!reply.contains("HEAD"));
        assert!(ctx.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_top_level_returns_full_help() {
        let ctx = Ctx::default();
        let tree = tree();
        for text in ["~dance", "~", "~  ", "~\tdance"] {
            let reply = tree.invoke(&ctx, text).await.unwrap();
            assert!(reply.starts_with("HEAD\n"), "{text}");
            assert!(reply.ends_with("\nFOOT"), "{text}");
            assert!(reply.contains("* ~**picky** <n>:"), "{text}");
        }
        assert!(ctx.calls().is_empty());
    }

    #[tokio::test]
    async fn test_leaf_receives_rest_args_verbatim() {
        let ctx = Ctx::default();
        let tree = tree();

        assert_eq!(tree.invoke(&ctx, "~sicko set uwu").await.unwrap(), "set uwu");
        tree.invoke(&ctx, "~sicko set The  Binding of Isaac ").await;
        tree.invoke(&ctx, "~sicko list").await;

        assert_eq!(
            ctx.calls(),
            vec![
                "set|uwu".to_string(),
                "set|The  Binding of Isaac ".to_string(),
                "list|".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_whitespace_runs_separate_segments() {
        let ctx = Ctx::default();
        let tree = tree();

        for text in ["~sicko  set uwu", "~sicko\tset uwu", "~sicko set\nuwu", "~ sicko set   uwu"] {
            assert_eq!(tree.invoke(&ctx, text).await.unwrap(), "set uwu", "{text:?}");
        }
        assert_eq!(tree.invoke(&ctx, "~picky\t7").await.unwrap(), "7");
        assert_eq!(ctx.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_leading_space_still_reaches_group() {
        let ctx = Ctx::default();
        let reply = tree().invoke(&ctx, "~ sicko").await.unwrap();
        assert_eq!(
            reply,
            "* ~**sicko set** <name>: Sets the sicko\n* ~**sicko list**: Lists sickos"
        );
        assert!(ctx.calls().is_empty());
    }

    #[tokio::test]
    async fn test_leaf_args_keep_inner_and_trailing_whitespace() {
        let ctx = Ctx::default();
        let tree = tree();
        tree.invoke(&ctx, "~sicko set  Dark  Souls ").await;
        tree.invoke(&ctx, "~sicko list\n").await;
        assert_eq!(
            ctx.calls(),
            vec!["set|Dark  Souls ".to_string(), "list|".to_string()]
        );
    }

    #[test]
    fn test_next_segment() {
        assert_eq!(next_segment("  sicko \t set"), ("sicko", " \t set"));
        assert_eq!(next_segment("set"), ("set", ""));
        assert_eq!(next_segment(" \n "), ("", ""));
    }

    #[tokio::test]
    async fn test_handler_failure_returns_leaf_help() {
        let ctx = Ctx::default();
        *ctx.mood.lock().unwrap() = "grumpy".to_string();
        let tree = tree();

        assert_eq!(tree.invoke(&ctx, "~picky 7").await.unwrap(), "7");
        assert_eq!(
            tree.invoke(&ctx, "~picky seven").await.unwrap(),
            "* ~**picky** <n>: Mood is grumpy"
        );
        assert_eq!(ctx.calls().len(), 2);
    }

    #[test]
    fn test_live_help_renders_current_state() {
        let ctx = Ctx::default();
        let tree = tree();
        *ctx.mood.lock().unwrap() = "fine".to_string();
        assert!(tree.help(&ctx).contains("Mood is fine"));
        *ctx.mood.lock().unwrap() = "awful".to_string();
        assert!(tree.help(&ctx).contains("Mood is awful"));
    }

    #[test]
    fn test_full_help_keeps_registration_order() {
        let ctx = Ctx::default();
        let help = tree().help(&ctx);
        let set = help.find("sicko set").unwrap();
        let list = help.find("sicko list").unwrap();
        let picky = help.find("picky").unwrap();
        assert!(set < list && list < picky);
    }

    #[test]
    fn test_leaf_used_as_group_is_rejected() {
        let mut tree = tree();
        let err = tree.add("picky more", &[], "nope", list).unwrap_err();
        assert_eq!(
            err,
            CommandTreeError::LeafAsBranch {
                path: "picky more".to_string(),
                segment: "picky".to_string(),
            }
        );
    }

    #[test]
    fn test_occupied_and_empty_paths_are_rejected() {
        let mut tree = tree();
        assert_eq!(
            tree.add("sicko set", &[], "again", set).unwrap_err(),
            CommandTreeError::Occupied {
                path: "sicko set".to_string()
            }
        );
        assert_eq!(
            tree.add("sicko", &[], "group", set).unwrap_err(),
            CommandTreeError::Occupied {
                path: "sicko".to_string()
            }
        );
        assert_eq!(
            tree.add("   ", &[], "blank", set).unwrap_err(),
            CommandTreeError::EmptyPath
        );
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let ctx = Ctx::default();
        let mut tree = CommandTree::new("!w ");
        tree.add("list", &[], "Lists", list).unwrap();
        assert_eq!(tree.invoke(&ctx, "!w list").await.unwrap(), "listed");
        assert_eq!(tree.invoke(&ctx, "~list").await, None);
    }
}
