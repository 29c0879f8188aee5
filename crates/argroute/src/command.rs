use std::fmt;
use std::sync::Arc;

use crate::app::HandlerBuilder;
use crate::flag::FlagParser;

/// Definition of a flag owned by a [`Command`].
#[derive(Debug, Clone)]
pub struct FlagDef {
    /// Name used in help output and on the command line (after `--`).
    ///
    /// Names and aliases must be unique across every flag visible at any level
    /// that can see this one; collisions are reported when routing.
    pub name: String,

    /// Alternative names. Not shown in help output.
    pub aliases: Vec<String>,

    pub description: String,

    /// Whether the flag takes a value (`--name value` or `--name=value`).
    pub value_accepted: bool,

    /// Restrict the flag to its owning command: it is only recognized once
    /// that command is the one being parsed, not from its ancestors.
    pub only_after_command_name: bool,

    pub parser: Arc<dyn FlagParser>,
}

impl FlagDef {
    pub fn new(name: impl Into<String>, parser: impl FlagParser + 'static) -> Self {
        Self::with_parser(name, Arc::new(parser))
    }

    pub fn with_parser(name: impl Into<String>, parser: Arc<dyn FlagParser>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            value_accepted: false,
            only_after_command_name: false,
            parser,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn value_accepted(mut self, accepted: bool) -> Self {
        self.value_accepted = accepted;
        self
    }

    pub fn only_after_command_name(mut self, only: bool) -> Self {
        self.only_after_command_name = only;
        self
    }
}

/// A node in the command tree.
///
/// The root of the tree is itself a `Command`; its name is never matched
/// against input.
#[derive(Clone, Default)]
pub struct Command {
    /// What the user types to select this command. Matched case-insensitively.
    pub name: String,

    /// Equivalent names, matched like `name` but not listed in help output.
    pub aliases: Vec<String>,

    /// Short, one-line description used in subcommand help.
    pub description: String,

    /// Omit the command from subcommand help.
    pub hidden: bool,

    pub flags: Vec<FlagDef>,

    pub subcommands: Vec<Command>,

    /// Invoked by [`Application::run`](crate::Application::run) when this is
    /// the deepest matched command.
    pub handler: Option<Arc<dyn HandlerBuilder>>,

    /// Whether free input is accepted, separate from flag values and
    /// subcommand names.
    pub args_accepted: bool,

    /// Whether `--` tokens that match no visible flag are let through as
    /// ordinary tokens (flag values, subcommand names or arguments) instead of
    /// failing as unknown flags.
    pub allow_unknown_flags: bool,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn flag(mut self, flag: FlagDef) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    pub fn handler(mut self, handler: impl HandlerBuilder + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn args_accepted(mut self, accepted: bool) -> Self {
        self.args_accepted = accepted;
        self
    }

    pub fn allow_unknown_flags(mut self, allow: bool) -> Self {
        self.allow_unknown_flags = allow;
        self
    }

    /// Whether `token` names this command, by name or alias, ignoring case.
    pub fn matches(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.name.to_lowercase() == token || self.aliases.iter().any(|a| a.to_lowercase() == token)
    }

    /// First direct subcommand (in declaration order) that `token` names.
    pub fn find_subcommand(&self, token: &str) -> Option<&Command> {
        self.subcommands.iter().find(|sub| sub.matches(token))
    }

    /// Follow `path` (names or aliases) down from this command.
    pub fn descend<S: AsRef<str>>(&self, path: &[S]) -> Option<&Command> {
        path.iter()
            .try_fold(self, |cmd, name| cmd.find_subcommand(name.as_ref()))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("description", &self.description)
            .field("hidden", &self.hidden)
            .field("flags", &self.flags)
            .field("subcommands", &self.subcommands)
            .field("handler", &self.handler.is_some())
            .field("args_accepted", &self.args_accepted)
            .field("allow_unknown_flags", &self.allow_unknown_flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn tree_can_be_shared_across_threads() {
        assert_send_sync::<Command>();
        assert_send_sync::<FlagDef>();

        let root = std::sync::Arc::new(Command::new("app").subcommand(Command::new("sub")));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let root = std::sync::Arc::clone(&root);
                std::thread::spawn(move || root.find_subcommand("SUB").map(|c| c.name.clone()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some("sub".to_string()));
        }
    }

    #[test]
    fn matches_name_and_aliases_ignoring_case() {
        let cmd = Command::new("Foo").alias("f");
        assert!(cmd.matches("foo"));
        assert!(cmd.matches("FOO"));
        assert!(cmd.matches("F"));
        assert!(!cmd.matches("fo"));
    }

    #[test]
    fn find_subcommand_prefers_declaration_order() {
        let root = Command::new("app")
            .subcommand(Command::new("first").alias("x").description("one"))
            .subcommand(Command::new("x").description("two"));
        let found = root.find_subcommand("X").expect("subcommand");
        assert_eq!(found.description, "one");
    }

    #[test]
    fn descend_follows_aliases() {
        let root = Command::new("app")
            .subcommand(Command::new("remote").alias("r").subcommand(Command::new("add")));
        assert_eq!(root.descend(&["r", "ADD"]).map(|c| c.name.as_str()), Some("add"));
        assert!(root.descend(&["remote", "nope"]).is_none());
        assert_eq!(root.descend::<&str>(&[]).map(|c| c.name.as_str()), Some("app"));
    }
}
